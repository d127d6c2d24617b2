use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::predict::{Ephemeris, TrajectoryPoint};

pub const DEFAULT_PAST: Duration = Duration::minutes(45);
pub const DEFAULT_FUTURE: Duration = Duration::minutes(90);
pub const DEFAULT_STEP: Duration = Duration::seconds(30);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrajectoryOptions {
    pub past: Duration,
    pub future: Duration,
    pub step: Duration,
}

impl Default for TrajectoryOptions {
    fn default() -> Self {
        Self {
            past: DEFAULT_PAST,
            future: DEFAULT_FUTURE,
            step: DEFAULT_STEP,
        }
    }
}

impl TrajectoryOptions {
    pub fn from_minutes(past_minutes: i64, future_minutes: i64, step_seconds: i64) -> Self {
        Self {
            past: Duration::minutes(past_minutes),
            future: Duration::minutes(future_minutes),
            step: Duration::seconds(step_seconds),
        }
    }
}

/// Ground track around `now`, both runs in ascending time.
#[derive(Debug, Clone, Default, Serialize, ToSchema)]
pub struct Trajectory {
    /// `now - past` up to and including `now`.
    pub past: Vec<TrajectoryPoint>,
    /// `now + step` up to `now + future`.
    pub future: Vec<TrajectoryPoint>,
    pub current: Option<TrajectoryPoint>,
}

/// Sample the ground track around `now`. Instants that fail to propagate are
/// left out.
pub fn sample_trajectory<E: Ephemeris + ?Sized>(
    ephemeris: &E,
    now: DateTime<Utc>,
    options: &TrajectoryOptions,
) -> Trajectory {
    let current = sample(ephemeris, now);
    if options.step <= Duration::zero() {
        log::warn!("Trajectory step must be positive, got {}", options.step);
        return Trajectory {
            current,
            ..Trajectory::default()
        };
    }

    let mut missing = 0usize;

    // Walk back from `now` so that `now` itself is always a sample.
    let mut past = Vec::new();
    let earliest = now - options.past;
    let mut cursor = now;
    while cursor >= earliest {
        match sample(ephemeris, cursor) {
            Some(point) => past.push(point),
            None => missing += 1,
        }
        cursor -= options.step;
    }
    past.reverse();

    let mut future = Vec::new();
    let latest = now + options.future;
    let mut cursor = now + options.step;
    while cursor <= latest {
        match sample(ephemeris, cursor) {
            Some(point) => future.push(point),
            None => missing += 1,
        }
        cursor += options.step;
    }

    if missing > 0 {
        log::debug!("Trajectory around {} omitted {} samples", now, missing);
    }

    Trajectory {
        past,
        future,
        current,
    }
}

fn sample<E: Ephemeris + ?Sized>(ephemeris: &E, at: DateTime<Utc>) -> Option<TrajectoryPoint> {
    ephemeris
        .propagate(at)
        .map(|state| TrajectoryPoint::new(state, at))
}
