use chrono::{DateTime, Utc};
use sgp4::{Constants, Elements};

use crate::predict::observer::{WGS84_A_KM, WGS84_E2};
use crate::predict::{LookAngles, Observer, PredictError, PropagatedState};

/// Anything that can place the satellite at an instant.
///
/// `None` means "no data at this instant": the model failed for that time.
/// Scans skip such samples instead of aborting.
pub trait Ephemeris {
    fn propagate(&self, at: DateTime<Utc>) -> Option<PropagatedState>;
    fn look_angles(&self, observer: &Observer, at: DateTime<Utc>) -> Option<LookAngles>;
}

/// SGP4 record built once per element set.
pub struct Propagator {
    elements: Elements,
    constants: Constants,
}

impl Propagator {
    pub fn from_lines(line1: &str, line2: &str) -> Result<Self, PredictError> {
        let elements = Elements::from_tle(None, line1.as_bytes(), line2.as_bytes())?;
        let constants = Constants::from_elements(&elements)?;
        Ok(Self {
            elements,
            constants,
        })
    }

    pub fn norad_id(&self) -> u64 {
        self.elements.norad_id
    }

    pub fn epoch(&self) -> DateTime<Utc> {
        self.elements.datetime.and_utc()
    }

    pub fn propagate(&self, at: DateTime<Utc>) -> Option<PropagatedState> {
        self.position_ecef_km(at).map(ecef_to_geodetic)
    }

    pub fn look_angles(&self, observer: &Observer, at: DateTime<Utc>) -> Option<LookAngles> {
        let sat_ecef = self.position_ecef_km(at)?;
        let sta_ecef = observer.position_ecef_km();

        let dr = [
            sat_ecef[0] - sta_ecef[0],
            sat_ecef[1] - sta_ecef[1],
            sat_ecef[2] - sta_ecef[2],
        ];
        let range_km = (dr[0] * dr[0] + dr[1] * dr[1] + dr[2] * dr[2]).sqrt();

        let (east, north, up) = ecef_to_enu(dr, observer.lat_rad(), observer.lon_rad());
        let azimuth_deg = east.atan2(north).to_degrees().rem_euclid(360.0);
        let elevation_deg = if range_km > 0.0 {
            (up / range_km).asin().to_degrees()
        } else {
            90.0
        };

        Some(LookAngles {
            elevation_deg,
            azimuth_deg,
            range_km,
        })
    }

    fn position_ecef_km(&self, at: DateTime<Utc>) -> Option<[f64; 3]> {
        let timestamp = at.naive_utc();
        let minutes = match self.elements.datetime_to_minutes_since_epoch(&timestamp) {
            Ok(m) => m,
            Err(e) => {
                log::trace!("No epoch offset for {}: {}", at, e);
                return None;
            }
        };
        let prediction = match self.constants.propagate(minutes) {
            Ok(p) => p,
            Err(e) => {
                log::trace!("SGP4 failed at {}: {}", at, e);
                return None;
            }
        };
        if !prediction.position.iter().all(|v| v.is_finite()) {
            return None;
        }

        let sidereal = sgp4::iau_epoch_to_sidereal_time(sgp4::julian_years_since_j2000(&timestamp));
        Some(teme_to_ecef_position(prediction.position, sidereal))
    }
}

impl Ephemeris for Propagator {
    fn propagate(&self, at: DateTime<Utc>) -> Option<PropagatedState> {
        Propagator::propagate(self, at)
    }

    fn look_angles(&self, observer: &Observer, at: DateTime<Utc>) -> Option<LookAngles> {
        Propagator::look_angles(self, observer, at)
    }
}

pub fn teme_to_ecef_position(pos_teme: [f64; 3], gmst: f64) -> [f64; 3] {
    let cos_gmst = gmst.cos();
    let sin_gmst = gmst.sin();
    [
        pos_teme[0] * cos_gmst + pos_teme[1] * sin_gmst,
        -pos_teme[0] * sin_gmst + pos_teme[1] * cos_gmst,
        pos_teme[2],
    ]
}

pub fn ecef_to_enu(dr: [f64; 3], lat_rad: f64, lon_rad: f64) -> (f64, f64, f64) {
    let sin_lat = lat_rad.sin();
    let cos_lat = lat_rad.cos();
    let sin_lon = lon_rad.sin();
    let cos_lon = lon_rad.cos();

    let east = -sin_lon * dr[0] + cos_lon * dr[1];
    let north = -sin_lat * cos_lon * dr[0] - sin_lat * sin_lon * dr[1] + cos_lat * dr[2];
    let up = cos_lat * cos_lon * dr[0] + cos_lat * sin_lon * dr[1] + sin_lat * dr[2];
    (east, north, up)
}

/// Iterative WGS-84 inversion; converges in a handful of rounds for LEO.
pub fn ecef_to_geodetic(pos: [f64; 3]) -> PropagatedState {
    let [x, y, z] = pos;
    let r = (x * x + y * y).sqrt();
    let longitude = y.atan2(x);

    let mut latitude = z.atan2(r);
    let mut c = 1.0;
    for _ in 0..20 {
        let sin_lat = latitude.sin();
        c = 1.0 / (1.0 - WGS84_E2 * sin_lat * sin_lat).sqrt();
        let next = (z + WGS84_A_KM * c * WGS84_E2 * sin_lat).atan2(r);
        let done = (next - latitude).abs() < 1e-12;
        latitude = next;
        if done {
            break;
        }
    }

    let altitude_km = if latitude.cos().abs() > 1e-9 {
        r / latitude.cos() - WGS84_A_KM * c
    } else {
        z.abs() - WGS84_A_KM * c * (1.0 - WGS84_E2)
    };

    PropagatedState {
        latitude_deg: latitude.to_degrees(),
        longitude_deg: normalize_longitude(longitude.to_degrees()),
        altitude_km,
    }
}

/// Maps any longitude into (-180, 180].
pub fn normalize_longitude(lon_deg: f64) -> f64 {
    let wrapped = lon_deg.rem_euclid(360.0);
    if wrapped > 180.0 {
        wrapped - 360.0
    } else {
        wrapped
    }
}
