use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex as StdMutex, PoisonError};

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::config::Config;
use crate::predict::{
    sample_trajectory, scan_passes_until, Observer, PassBundle, PassSearch, Propagator,
    Trajectory, TrajectoryOptions, TrajectoryPoint, DEFAULT_LOOKAHEAD,
};
use crate::tle::{FileCache, HttpTleSource, OrbitalElementStore, OrbitalElements, DEFAULT_TIMEOUT};

use super::error::TrackerError;

#[derive(Debug, Clone, Copy)]
pub struct TrackerSettings {
    pub passes: PassSearch,
    pub lookahead: Duration,
    pub trajectory: TrajectoryOptions,
}

impl Default for TrackerSettings {
    fn default() -> Self {
        Self {
            passes: PassSearch::default(),
            lookahead: DEFAULT_LOOKAHEAD,
            trajectory: TrajectoryOptions::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Overview {
    pub elements: OrbitalElements,
    pub passes: PassBundle,
    pub trajectory: Trajectory,
}

struct Memo {
    line1: String,
    line2: String,
    propagator: Arc<Propagator>,
}

/// Entry point for hosts: element store plus the scans that consume it.
pub struct Tracker {
    store: OrbitalElementStore,
    settings: TrackerSettings,
    memo: StdMutex<Option<Memo>>,
}

impl Tracker {
    pub fn new(store: OrbitalElementStore, settings: TrackerSettings) -> Self {
        Self {
            store,
            settings,
            memo: StdMutex::new(None),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, TrackerError> {
        let timeout = config.tle.timeout.to_std().unwrap_or(DEFAULT_TIMEOUT);
        let source =
            HttpTleSource::for_catalog_number(&config.tle.url, config.tle.norad_id, timeout)?;
        let cache = FileCache::new(config.tle.cache_path.clone());
        let store = OrbitalElementStore::new(source, cache).with_max_age(config.tle.max_age);
        Ok(Self::new(store, config.tracker_settings()))
    }

    pub fn settings(&self) -> &TrackerSettings {
        &self.settings
    }

    pub async fn elements(&self, force_refresh: bool) -> Result<OrbitalElements, TrackerError> {
        Ok(self.store.get_orbital_elements(force_refresh).await?)
    }

    /// SGP4 record for the current element set, rebuilt only when the
    /// elements change.
    pub async fn propagator(&self) -> Result<Arc<Propagator>, TrackerError> {
        let elements = self.elements(false).await?;
        self.propagator_for(&elements)
    }

    fn propagator_for(&self, elements: &OrbitalElements) -> Result<Arc<Propagator>, TrackerError> {
        let mut memo = self.memo.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(m) = memo.as_ref() {
            if m.line1 == elements.line1 && m.line2 == elements.line2 {
                return Ok(m.propagator.clone());
            }
        }

        let propagator = Arc::new(Propagator::from_lines(&elements.line1, &elements.line2)?);
        log::info!(
            "Built propagator for NORAD {} (epoch {})",
            propagator.norad_id(),
            propagator.epoch()
        );
        *memo = Some(Memo {
            line1: elements.line1.clone(),
            line2: elements.line2.clone(),
            propagator: propagator.clone(),
        });
        Ok(propagator)
    }

    pub async fn compute_pass_bundle(&self, observer: Observer) -> Result<PassBundle, TrackerError> {
        self.compute_pass_bundle_at(observer, Utc::now(), None).await
    }

    /// Passes over `observer` from `start` to `start + lookahead`.
    ///
    /// Setting `abort` (for instance because the observer moved) stops the
    /// scan and yields [`TrackerError::Aborted`].
    pub async fn compute_pass_bundle_at(
        &self,
        observer: Observer,
        start: DateTime<Utc>,
        abort: Option<Arc<AtomicBool>>,
    ) -> Result<PassBundle, TrackerError> {
        observer.validate()?;
        let propagator = self.propagator().await?;
        self.pass_bundle(propagator, observer, start, abort).await
    }

    pub async fn calculate_trajectory(
        &self,
        options: TrajectoryOptions,
    ) -> Result<Trajectory, TrackerError> {
        self.calculate_trajectory_at(Utc::now(), options).await
    }

    pub async fn calculate_trajectory_at(
        &self,
        now: DateTime<Utc>,
        options: TrajectoryOptions,
    ) -> Result<Trajectory, TrackerError> {
        let propagator = self.propagator().await?;
        Self::trajectory(propagator, now, options).await
    }

    pub async fn current_position(&self) -> Result<TrajectoryPoint, TrackerError> {
        self.position_at(Utc::now()).await
    }

    pub async fn position_at(&self, at: DateTime<Utc>) -> Result<TrajectoryPoint, TrackerError> {
        let propagator = self.propagator().await?;
        propagator
            .propagate(at)
            .map(|state| TrajectoryPoint::new(state, at))
            .ok_or(TrackerError::NoPosition(at))
    }

    /// Pass search and ground track for the same instant, scanned in parallel.
    pub async fn overview_at(
        &self,
        observer: Observer,
        now: DateTime<Utc>,
    ) -> Result<Overview, TrackerError> {
        observer.validate()?;
        let elements = self.elements(false).await?;
        let propagator = self.propagator_for(&elements)?;
        let (passes, trajectory) = tokio::try_join!(
            self.pass_bundle(propagator.clone(), observer, now, None),
            Self::trajectory(propagator, now, self.settings.trajectory),
        )?;
        Ok(Overview {
            elements,
            passes,
            trajectory,
        })
    }

    async fn pass_bundle(
        &self,
        propagator: Arc<Propagator>,
        observer: Observer,
        start: DateTime<Utc>,
        abort: Option<Arc<AtomicBool>>,
    ) -> Result<PassBundle, TrackerError> {
        let search = self.settings.passes;
        let end = start + self.settings.lookahead;
        let scan = tokio::task::spawn_blocking(move || {
            scan_passes_until(
                propagator.as_ref(),
                &observer,
                start,
                end,
                &search,
                abort.as_deref(),
            )
        })
        .await?;

        if scan.aborted {
            return Err(TrackerError::Aborted);
        }
        log::debug!(
            "Found {} passes over {:.3},{:.3}",
            scan.passes.len(),
            observer.latitude_deg,
            observer.longitude_deg
        );
        Ok(PassBundle::from_passes(scan.passes))
    }

    async fn trajectory(
        propagator: Arc<Propagator>,
        now: DateTime<Utc>,
        options: TrajectoryOptions,
    ) -> Result<Trajectory, TrackerError> {
        let trajectory = tokio::task::spawn_blocking(move || {
            sample_trajectory(propagator.as_ref(), now, &options)
        })
        .await?;
        Ok(trajectory)
    }
}
