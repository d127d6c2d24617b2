use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::geo::{lon_lat, split_antimeridian};
use crate::predict::TrajectoryPoint;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum FeatureType {
    Feature,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum FeatureCollectionType {
    FeatureCollection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "type")]
pub enum Geometry {
    LineString {
        #[schema(value_type = Vec<Vec<f64>>)]
        coordinates: Vec<[f64; 2]>,
    },
    MultiLineString {
        #[schema(value_type = Vec<Vec<Vec<f64>>>)]
        coordinates: Vec<Vec<[f64; 2]>>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Feature {
    #[serde(rename = "type")]
    pub kind: FeatureType,
    pub geometry: Geometry,
    #[schema(value_type = Object)]
    pub properties: serde_json::Map<String, serde_json::Value>,
}

impl Feature {
    pub fn new(geometry: Geometry) -> Self {
        Self {
            kind: FeatureType::Feature,
            geometry,
            properties: serde_json::Map::new(),
        }
    }

    pub fn with_property(mut self, key: &str, value: impl Into<serde_json::Value>) -> Self {
        self.properties.insert(key.to_string(), value.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct FeatureCollection {
    #[serde(rename = "type")]
    pub kind: FeatureCollectionType,
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    pub fn new(features: Vec<Feature>) -> Self {
        Self {
            kind: FeatureCollectionType::FeatureCollection,
            features,
        }
    }
}

/// Ground track as a GeoJSON feature: a `LineString` when the track does not
/// cross the antimeridian, a `MultiLineString` otherwise (also when nothing
/// drawable is left).
pub fn trajectory_to_geojson(points: &[TrajectoryPoint]) -> Feature {
    let mut segments = split_antimeridian(&lon_lat(points));
    let geometry = if segments.len() == 1 {
        Geometry::LineString {
            coordinates: segments.remove(0),
        }
    } else {
        Geometry::MultiLineString {
            coordinates: segments,
        }
    };
    Feature::new(geometry)
}
