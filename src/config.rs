use chrono::Duration;
use serde::{Deserialize, Deserializer};
use std::path::PathBuf;
use thiserror::Error;

use crate::predict::{Observer, PassSearch, PredictError, TrajectoryOptions};
use crate::tle::{DEFAULT_URL_TEMPLATE, ISS_NORAD_ID};
use crate::tracker::TrackerSettings;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
    #[error("Invalid observer: {0}")]
    Observer(#[from] PredictError),
}

/// Every section is optional; an empty file gives the stock ISS setup.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub observer: Option<ObserverConfig>,
    pub tle: TleConfig,
    pub passes: PassesConfig,
    pub trajectory: TrajectoryConfig,
    pub web: WebConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ObserverConfig {
    pub name: Option<String>,
    /// `"lat, lon"` in degrees.
    pub coordinates: String,
    #[serde(default)]
    pub altitude_km: f64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TleConfig {
    /// May contain `{norad_id}`.
    pub url: String,
    pub norad_id: u32,
    pub cache_path: PathBuf,
    #[serde(deserialize_with = "deserialize_duration")]
    pub max_age: Duration,
    #[serde(deserialize_with = "deserialize_duration")]
    pub timeout: Duration,
}

impl Default for TleConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL_TEMPLATE.to_string(),
            norad_id: ISS_NORAD_ID,
            cache_path: PathBuf::from("data/tle_cache.json"),
            max_age: crate::tle::DEFAULT_MAX_AGE,
            timeout: Duration::seconds(10),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PassesConfig {
    pub min_elevation_deg: f64,
    #[serde(deserialize_with = "deserialize_duration")]
    pub lookahead: Duration,
    #[serde(deserialize_with = "deserialize_duration")]
    pub step: Duration,
    pub refine: bool,
}

impl Default for PassesConfig {
    fn default() -> Self {
        let search = PassSearch::default();
        Self {
            min_elevation_deg: search.min_elevation_deg,
            lookahead: crate::predict::DEFAULT_LOOKAHEAD,
            step: search.step,
            refine: search.refine,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TrajectoryConfig {
    #[serde(deserialize_with = "deserialize_duration")]
    pub past: Duration,
    #[serde(deserialize_with = "deserialize_duration")]
    pub future: Duration,
    #[serde(deserialize_with = "deserialize_duration")]
    pub step: Duration,
}

impl Default for TrajectoryConfig {
    fn default() -> Self {
        let options = TrajectoryOptions::default();
        Self {
            past: options.past,
            future: options.future,
            step: options.step,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WebConfig {
    pub bind: String,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:8080".to_string(),
        }
    }
}

impl Config {
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        // serde_yaml reads an empty document as unit, not as an empty map.
        let config: Config = if content.trim().is_empty() {
            Config::default()
        } else {
            serde_yaml::from_str(content)?
        };
        config.validate()?;
        Ok(config)
    }

    /// Defaults when no path is given.
    pub fn load(path: Option<&str>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("tle.max_age", self.tle.max_age),
            ("tle.timeout", self.tle.timeout),
            ("passes.lookahead", self.passes.lookahead),
            ("passes.step", self.passes.step),
            ("trajectory.step", self.trajectory.step),
        ];
        for (name, value) in positive {
            if value <= Duration::zero() {
                return Err(ConfigError::Invalid(format!("{} must be positive", name)));
            }
        }
        if !(0.0..=90.0).contains(&self.passes.min_elevation_deg) {
            return Err(ConfigError::Invalid(format!(
                "passes.min_elevation_deg {} outside [0, 90]",
                self.passes.min_elevation_deg
            )));
        }
        self.observer()?;
        Ok(())
    }

    /// Default observer, if one is configured.
    pub fn observer(&self) -> Result<Option<Observer>, ConfigError> {
        self.observer
            .as_ref()
            .map(|o| Observer::from_coordinates(&o.coordinates, Some(o.altitude_km)))
            .transpose()
            .map_err(ConfigError::from)
    }

    /// Display name of the configured observer, falling back to its coordinates.
    pub fn observer_label(&self) -> Option<String> {
        self.observer.as_ref().map(|o| match &o.name {
            Some(name) => name.clone(),
            None => o.coordinates.trim().to_string(),
        })
    }

    pub fn tracker_settings(&self) -> TrackerSettings {
        TrackerSettings {
            passes: PassSearch {
                step: self.passes.step,
                min_elevation_deg: self.passes.min_elevation_deg,
                refine: self.passes.refine,
            },
            lookahead: self.passes.lookahead,
            trajectory: TrajectoryOptions {
                past: self.trajectory.past,
                future: self.trajectory.future,
                step: self.trajectory.step,
            },
        }
    }
}

fn deserialize_duration<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    parse_duration(&s).map_err(serde::de::Error::custom)
}

/// Humantime duration such as `"36h"` or `"1m 30s"`.
pub fn parse_duration(s: &str) -> Result<Duration, String> {
    humantime::parse_duration(s.trim())
        .map_err(|e| e.to_string())
        .and_then(|d| Duration::from_std(d).map_err(|e| e.to_string()))
}
