use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::predict::{Ephemeris, LookAngles, Observer, Pass};

pub const DEFAULT_MIN_ELEVATION_DEG: f64 = 20.0;
pub const DEFAULT_LOOKAHEAD: Duration = Duration::hours(36);
pub const DEFAULT_STEP: Duration = Duration::seconds(10);

// Elevation exactly on the horizon counts as below it.
const HORIZON_ELEVATION: f64 = 0.0;
const FINE_STEP_SECONDS: i64 = 1;

#[derive(Debug, Clone, Copy)]
pub struct PassSearch {
    pub step: Duration,
    /// Passes peaking at or above this are flagged `visible`.
    pub min_elevation_deg: f64,
    /// Bisect AOS/LOS between samples down to one second.
    pub refine: bool,
}

impl Default for PassSearch {
    fn default() -> Self {
        Self {
            step: DEFAULT_STEP,
            min_elevation_deg: DEFAULT_MIN_ELEVATION_DEG,
            refine: false,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct PassScan {
    pub passes: Vec<Pass>,
    /// Samples skipped because the satellite could not be propagated.
    pub gaps: usize,
    pub aborted: bool,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PassBundle {
    pub next_pass: Option<Pass>,
    pub next_visible_pass: Option<Pass>,
    pub passes: Vec<Pass>,
}

impl PassBundle {
    pub fn from_passes(passes: Vec<Pass>) -> Self {
        Self {
            next_pass: passes.first().cloned(),
            next_visible_pass: passes.iter().find(|p| p.visible).cloned(),
            passes,
        }
    }
}

struct OpenPass {
    aos: DateTime<Utc>,
    aos_azimuth_deg: f64,
    max_elevation_deg: f64,
    tca: DateTime<Utc>,
}

impl OpenPass {
    fn close(
        self,
        los: DateTime<Utc>,
        los_azimuth_deg: Option<f64>,
        truncated: bool,
        min_elevation_deg: f64,
    ) -> Pass {
        let max_elevation_deg = round2(self.max_elevation_deg.max(0.0));
        Pass {
            aos: self.aos,
            los,
            tca: self.tca,
            max_elevation_deg,
            aos_azimuth_deg: round2(self.aos_azimuth_deg),
            los_azimuth_deg: los_azimuth_deg.map(round2),
            duration_seconds: (los - self.aos).num_seconds(),
            visible: max_elevation_deg >= min_elevation_deg,
            truncated,
        }
    }
}

enum ScanState {
    OutsidePass,
    InsidePass(OpenPass),
}

/// Find all passes of the satellite over `observer` between `start` and `end`.
pub fn find_passes<E: Ephemeris + ?Sized>(
    ephemeris: &E,
    observer: &Observer,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    search: &PassSearch,
) -> Vec<Pass> {
    scan_passes(ephemeris, observer, start, end, search).passes
}

pub fn scan_passes<E: Ephemeris + ?Sized>(
    ephemeris: &E,
    observer: &Observer,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    search: &PassSearch,
) -> PassScan {
    scan_passes_until(ephemeris, observer, start, end, search, None)
}

/// Same as [`scan_passes`], stopping early once `abort` is set. An aborted
/// scan keeps the passes closed so far and drops the one in progress.
pub fn scan_passes_until<E: Ephemeris + ?Sized>(
    ephemeris: &E,
    observer: &Observer,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    search: &PassSearch,
    abort: Option<&AtomicBool>,
) -> PassScan {
    let mut scan = PassScan::default();
    if search.step <= Duration::zero() {
        log::warn!("Pass search step must be positive, got {}", search.step);
        return scan;
    }

    let mut state = ScanState::OutsidePass;
    let mut last_sampled: Option<DateTime<Utc>> = None;
    let mut cursor = start;

    while cursor <= end {
        if abort.is_some_and(|flag| flag.load(Ordering::Relaxed)) {
            scan.aborted = true;
            break;
        }

        // A gap neither opens, extends nor closes a pass.
        let Some(angles) = ephemeris.look_angles(observer, cursor) else {
            scan.gaps += 1;
            cursor += search.step;
            continue;
        };
        let above = angles.elevation_deg > HORIZON_ELEVATION;

        state = match state {
            ScanState::OutsidePass if above => {
                let (aos, aos_azimuth_deg) =
                    crossing(ephemeris, observer, last_sampled, cursor, &angles, true, search);
                ScanState::InsidePass(OpenPass {
                    aos,
                    aos_azimuth_deg,
                    max_elevation_deg: angles.elevation_deg,
                    tca: cursor,
                })
            }
            ScanState::OutsidePass => ScanState::OutsidePass,
            ScanState::InsidePass(mut open) if above => {
                if angles.elevation_deg > open.max_elevation_deg {
                    open.max_elevation_deg = angles.elevation_deg;
                    open.tca = cursor;
                }
                ScanState::InsidePass(open)
            }
            ScanState::InsidePass(open) => {
                let (los, los_azimuth_deg) =
                    crossing(ephemeris, observer, last_sampled, cursor, &angles, false, search);
                scan.passes.push(open.close(
                    los,
                    Some(los_azimuth_deg),
                    false,
                    search.min_elevation_deg,
                ));
                ScanState::OutsidePass
            }
        };

        last_sampled = Some(cursor);
        cursor += search.step;
    }

    if let ScanState::InsidePass(open) = state {
        if !scan.aborted {
            let los_azimuth_deg = ephemeris.look_angles(observer, end).map(|a| a.azimuth_deg);
            scan.passes
                .push(open.close(end, los_azimuth_deg, true, search.min_elevation_deg));
        }
    }

    if scan.gaps > 0 {
        log::debug!(
            "Pass scan {} .. {} skipped {} samples without a position",
            start,
            end,
            scan.gaps
        );
    }

    scan
}

/// Horizon crossing time and azimuth for a transition seen at `after`.
fn crossing<E: Ephemeris + ?Sized>(
    ephemeris: &E,
    observer: &Observer,
    before: Option<DateTime<Utc>>,
    after: DateTime<Utc>,
    sampled: &LookAngles,
    is_aos: bool,
    search: &PassSearch,
) -> (DateTime<Utc>, f64) {
    match before {
        Some(before) if search.refine => {
            refine_crossing(ephemeris, observer, before, after, is_aos)
                .unwrap_or((after, sampled.azimuth_deg))
        }
        _ => (after, sampled.azimuth_deg),
    }
}

/// Binary search for the first instant on the far side of the horizon.
/// Gives up (returns `None`) when a probe cannot be propagated.
fn refine_crossing<E: Ephemeris + ?Sized>(
    ephemeris: &E,
    observer: &Observer,
    before: DateTime<Utc>,
    after: DateTime<Utc>,
    is_aos: bool, // true = rising, false = setting
) -> Option<(DateTime<Utc>, f64)> {
    let mut low = before;
    let mut high = after;

    while (high - low).num_seconds() > FINE_STEP_SECONDS {
        let mid = low + (high - low) / 2;
        let sample = ephemeris.look_angles(observer, mid)?;

        let above = sample.elevation_deg > HORIZON_ELEVATION;
        if above == is_aos {
            high = mid;
        } else {
            low = mid;
        }
    }

    let final_sample = ephemeris.look_angles(observer, high)?;
    Some((high, final_sample.azimuth_deg))
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}
