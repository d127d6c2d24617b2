use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

/// Sub-satellite point at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct PropagatedState {
    pub latitude_deg: f64,
    /// Normalized to (-180, 180].
    pub longitude_deg: f64,
    pub altitude_km: f64,
}

/// Satellite direction as seen from an observer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct LookAngles {
    /// Positive above the local horizon.
    pub elevation_deg: f64,
    /// Clockwise from north, in [0, 360).
    pub azimuth_deg: f64,
    pub range_km: f64,
}

/// One continuous interval with the satellite above the observer's horizon
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Pass {
    pub aos: DateTime<Utc>,
    pub los: DateTime<Utc>,
    /// Time of maximum elevation.
    pub tca: DateTime<Utc>,
    pub max_elevation_deg: f64,
    pub aos_azimuth_deg: f64,
    /// `None` when the pass was cut by the end of the search window and the
    /// satellite could not be propagated there.
    pub los_azimuth_deg: Option<f64>,
    pub duration_seconds: i64,
    pub visible: bool,
    /// Still above the horizon when the search window ended; `los` is the
    /// window end, not a real set time.
    pub truncated: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct TrajectoryPoint {
    pub latitude_deg: f64,
    pub longitude_deg: f64,
    pub altitude_km: f64,
    pub at: DateTime<Utc>,
}

impl TrajectoryPoint {
    pub fn new(state: PropagatedState, at: DateTime<Utc>) -> Self {
        Self {
            latitude_deg: state.latitude_deg,
            longitude_deg: state.longitude_deg,
            altitude_km: state.altitude_km,
            at,
        }
    }
}
