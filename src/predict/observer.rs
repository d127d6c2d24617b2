use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::predict::PredictError;

// WGS-84
pub const WGS84_A_KM: f64 = 6378.137;
pub const WGS84_E2: f64 = 0.00669437999014;

/// Ground location the passes are predicted for.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Observer {
    pub latitude_deg: f64,
    pub longitude_deg: f64,
    #[serde(default)]
    pub altitude_km: f64,
}

impl Observer {
    pub fn new(latitude_deg: f64, longitude_deg: f64, altitude_km: f64) -> Result<Self, PredictError> {
        let observer = Self {
            latitude_deg,
            longitude_deg,
            altitude_km,
        };
        observer.validate()?;
        Ok(observer)
    }

    /// Parse `"lat, lon"` as written in the config file.
    pub fn from_coordinates(coordinates: &str, altitude_km: Option<f64>) -> Result<Self, PredictError> {
        let parts: Vec<_> = coordinates.split(',').map(|s| s.trim()).collect();
        if parts.len() != 2 {
            return Err(PredictError::InvalidObserver(format!(
                "expected \"lat, lon\", got {:?}",
                coordinates
            )));
        }
        let lat = parts[0]
            .parse()
            .map_err(|_| PredictError::InvalidObserver(format!("bad latitude {:?}", parts[0])))?;
        let lon = parts[1]
            .parse()
            .map_err(|_| PredictError::InvalidObserver(format!("bad longitude {:?}", parts[1])))?;
        Self::new(lat, lon, altitude_km.unwrap_or(0.0))
    }

    /// Rejects locations that would only produce nonsense angles.
    pub fn validate(&self) -> Result<(), PredictError> {
        if !self.latitude_deg.is_finite() || !(-90.0..=90.0).contains(&self.latitude_deg) {
            return Err(PredictError::InvalidObserver(format!(
                "latitude {} outside [-90, 90]",
                self.latitude_deg
            )));
        }
        if !self.longitude_deg.is_finite() || !(-180.0..=180.0).contains(&self.longitude_deg) {
            return Err(PredictError::InvalidObserver(format!(
                "longitude {} outside [-180, 180]",
                self.longitude_deg
            )));
        }
        if !self.altitude_km.is_finite() {
            return Err(PredictError::InvalidObserver(format!(
                "altitude {} is not finite",
                self.altitude_km
            )));
        }
        Ok(())
    }

    pub fn lat_rad(&self) -> f64 {
        self.latitude_deg.to_radians()
    }

    pub fn lon_rad(&self) -> f64 {
        self.longitude_deg.to_radians()
    }

    pub fn position_ecef_km(&self) -> [f64; 3] {
        let lat = self.lat_rad();
        let lon = self.lon_rad();
        let sin_lat = lat.sin();
        let cos_lat = lat.cos();
        let n = WGS84_A_KM / (1.0 - WGS84_E2 * sin_lat * sin_lat).sqrt();
        let x = (n + self.altitude_km) * cos_lat * lon.cos();
        let y = (n + self.altitude_km) * cos_lat * lon.sin();
        let z = (n * (1.0 - WGS84_E2) + self.altitude_km) * sin_lat;
        [x, y, z]
    }
}
