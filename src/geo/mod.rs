//! Presentation adapters: turn ground tracks into renderer input.

mod antimeridian;
mod geojson;
mod globe;

pub use antimeridian::{lon_lat, split_antimeridian, split_by_longitude, Segment, MAX_LONGITUDE_JUMP_DEG};
pub use geojson::{trajectory_to_geojson, Feature, FeatureCollection, Geometry};
pub use globe::{globe_paths, GlobePoint};
