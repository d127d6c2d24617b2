use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Persisted form of the element set: `{line1, line2, ts}` with `ts` in epoch
/// milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TleRecord {
    pub line1: String,
    pub line2: String,
    #[serde(rename = "ts", with = "chrono::serde::ts_milliseconds")]
    pub fetched_at: DateTime<Utc>,
}

impl TleRecord {
    /// Fresh while strictly younger than `max_age`.
    pub fn is_fresh(&self, now: DateTime<Utc>, max_age: Duration) -> bool {
        now - self.fetched_at < max_age
    }

    pub fn answer(&self, from_cache: bool, stale: bool) -> OrbitalElements {
        OrbitalElements {
            line1: self.line1.clone(),
            line2: self.line2.clone(),
            fetched_at: self.fetched_at,
            from_cache,
            stale,
        }
    }
}

/// What the store hands out.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct OrbitalElements {
    pub line1: String,
    pub line2: String,
    pub fetched_at: DateTime<Utc>,
    pub from_cache: bool,
    /// Served from an expired cache entry because the refresh failed.
    pub stale: bool,
}
