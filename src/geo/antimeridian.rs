use crate::predict::TrajectoryPoint;

/// A longitude step larger than this between neighbours means the track went
/// across ±180°, not the long way round.
pub const MAX_LONGITUDE_JUMP_DEG: f64 = 180.0;

/// `[lon, lat]` run without an antimeridian crossing.
pub type Segment = Vec<[f64; 2]>;

pub fn lon_lat(points: &[TrajectoryPoint]) -> Vec<[f64; 2]> {
    points
        .iter()
        .map(|p| [p.longitude_deg, p.latitude_deg])
        .collect()
}

/// Split an ordered `[lon, lat]` sequence wherever it wraps around the
/// antimeridian. Segments shorter than two points are dropped.
pub fn split_antimeridian(points: &[[f64; 2]]) -> Vec<Segment> {
    split_by_longitude(points, |p| p[0])
}

/// Generic form of [`split_antimeridian`] for any point type.
pub fn split_by_longitude<T: Clone>(points: &[T], longitude: impl Fn(&T) -> f64) -> Vec<Vec<T>> {
    let mut segments = Vec::new();
    let mut current: Vec<T> = Vec::new();

    for point in points {
        if let Some(prev) = current.last() {
            if (longitude(point) - longitude(prev)).abs() > MAX_LONGITUDE_JUMP_DEG {
                segments.push(std::mem::take(&mut current));
            }
        }
        current.push(point.clone());
    }
    segments.push(current);

    segments.retain(|segment| segment.len() >= 2);
    segments
}
