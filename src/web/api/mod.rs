pub mod elements;
pub mod error;
pub mod passes;
pub mod trajectory;
