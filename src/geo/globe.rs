use serde::Serialize;
use utoipa::ToSchema;

use crate::geo::split_by_longitude;
use crate::predict::TrajectoryPoint;

/// Mean Earth radius; globe renderers scale altitudes by it.
pub const GLOBE_EARTH_RADIUS_KM: f64 = 6371.0;

/// Path vertex in the shape WebGL globes consume.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct GlobePoint {
    pub lat: f64,
    pub lng: f64,
    /// Altitude in Earth radii.
    pub alt: f64,
}

impl From<&TrajectoryPoint> for GlobePoint {
    fn from(point: &TrajectoryPoint) -> Self {
        Self {
            lat: point.latitude_deg,
            lng: point.longitude_deg,
            alt: point.altitude_km / GLOBE_EARTH_RADIUS_KM,
        }
    }
}

pub fn globe_paths(points: &[TrajectoryPoint]) -> Vec<Vec<GlobePoint>> {
    let vertices: Vec<GlobePoint> = points.iter().map(GlobePoint::from).collect();
    split_by_longitude(&vertices, |p| p.lng)
}
