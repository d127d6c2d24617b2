mod error;
mod tracker;

pub use error::TrackerError;
pub use tracker::{Overview, Tracker, TrackerSettings};
