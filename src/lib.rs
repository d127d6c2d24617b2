pub mod config;
pub mod geo;
pub mod predict;
pub mod tle;
pub mod tracker;
pub mod web;

pub use config::Config;
pub use tracker::{Tracker, TrackerError};
