mod error;
mod observer;
mod pass_finder;
mod propagation;
mod trajectory;
mod types;

pub use error::PredictError;
pub use observer::Observer;
pub use pass_finder::{
    find_passes, scan_passes, scan_passes_until, PassBundle, PassScan, PassSearch,
    DEFAULT_LOOKAHEAD, DEFAULT_MIN_ELEVATION_DEG,
};
pub use propagation::{normalize_longitude, Ephemeris, Propagator};
pub use trajectory::{sample_trajectory, Trajectory, TrajectoryOptions};
pub use types::{LookAngles, Pass, PropagatedState, TrajectoryPoint};
