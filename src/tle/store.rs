use chrono::{DateTime, Duration, SubsecRound, Utc};
use tokio::sync::Mutex;

use crate::tle::parsing::parse_tle_lines;
use crate::tle::{OrbitalElements, TleCache, TleError, TleRecord, TleSource};

pub const DEFAULT_MAX_AGE: Duration = Duration::hours(6);

/// Fetches the element set for one object and keeps it cached.
///
/// A cached entry younger than `max_age` is served without touching the
/// network. Refreshes go through a single lock, so callers arriving during a
/// fetch wait for it and then reuse what it wrote. When a refresh fails, any
/// cached entry is served with `stale: true` regardless of its age.
pub struct OrbitalElementStore {
    source: Box<dyn TleSource>,
    cache: Box<dyn TleCache>,
    max_age: Duration,
    refresh: Mutex<()>,
}

impl OrbitalElementStore {
    pub fn new(source: impl TleSource + 'static, cache: impl TleCache + 'static) -> Self {
        Self {
            source: Box::new(source),
            cache: Box::new(cache),
            max_age: DEFAULT_MAX_AGE,
            refresh: Mutex::new(()),
        }
    }

    pub fn with_max_age(mut self, max_age: Duration) -> Self {
        self.max_age = max_age;
        self
    }

    pub fn max_age(&self) -> Duration {
        self.max_age
    }

    pub async fn get_orbital_elements(&self, force_refresh: bool) -> Result<OrbitalElements, TleError> {
        self.get_orbital_elements_at(Utc::now(), force_refresh).await
    }

    pub async fn get_orbital_elements_at(
        &self,
        now: DateTime<Utc>,
        force_refresh: bool,
    ) -> Result<OrbitalElements, TleError> {
        let seen = self.cached();
        if !force_refresh {
            if let Some(record) = &seen {
                if record.is_fresh(now, self.max_age) {
                    log::debug!("Using cached TLE from {}", record.fetched_at);
                    return Ok(record.answer(true, false));
                }
            }
        }
        let seen_at = seen.map(|record| record.fetched_at);

        let _refresh = self.refresh.lock().await;

        // Whoever held the lock before us may already have done the work.
        let cached = self.cached();
        if let Some(record) = &cached {
            if Some(record.fetched_at) != seen_at {
                return Ok(record.answer(true, false));
            }
        }

        match self.fetch(now).await {
            Ok(record) => {
                log::info!("Refreshed TLE at {}", record.fetched_at);
                Ok(record.answer(false, false))
            }
            Err(err) => match cached {
                Some(record) => {
                    log::warn!(
                        "TLE refresh failed ({}), serving cached copy from {}",
                        err,
                        record.fetched_at
                    );
                    Ok(record.answer(true, true))
                }
                None => Err(match err {
                    TleError::Parse(_) => err,
                    other => TleError::Unavailable(other.to_string()),
                }),
            },
        }
    }

    async fn fetch(&self, now: DateTime<Utc>) -> Result<TleRecord, TleError> {
        let text = self.source.fetch().await?;
        let (line1, line2) = parse_tle_lines(&text)?;
        // The cache keeps milliseconds; hand out the same instant it will return.
        let record = TleRecord {
            line1,
            line2,
            fetched_at: now.trunc_subsecs(3),
        };
        if let Err(e) = self.cache.save(&record) {
            log::warn!("Failed to write TLE cache: {}", e);
        }
        Ok(record)
    }

    fn cached(&self) -> Option<TleRecord> {
        match self.cache.load() {
            Ok(record) => record,
            Err(e) => {
                log::warn!("Ignoring unreadable TLE cache: {}", e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predict::fixtures::{ISS_LINE1, ISS_LINE2};
    use crate::tle::MemoryCache;
    use async_trait::async_trait;
    use chrono::TimeZone;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    enum Reply {
        Tle,
        Garbage,
        Down,
    }

    struct FakeSource {
        reply: Reply,
        calls: Arc<AtomicUsize>,
    }

    impl FakeSource {
        fn new(reply: Reply) -> (Self, Arc<AtomicUsize>) {
            let calls = Arc::new(AtomicUsize::new(0));
            (
                Self {
                    reply,
                    calls: calls.clone(),
                },
                calls,
            )
        }
    }

    #[async_trait]
    impl TleSource for FakeSource {
        async fn fetch(&self) -> Result<String, TleError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.reply {
                Reply::Tle => Ok(format!("ISS (ZARYA)\n{}\n{}\n", ISS_LINE1, ISS_LINE2)),
                Reply::Garbage => Ok("<html>maintenance</html>".into()),
                Reply::Down => Err(TleError::Status(503)),
            }
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    fn cached_at(at: DateTime<Utc>) -> MemoryCache {
        MemoryCache::with_record(TleRecord {
            line1: "1 cached".into(),
            line2: "2 cached".into(),
            fetched_at: at,
        })
    }

    #[tokio::test]
    async fn fresh_cache_skips_network() {
        let (source, calls) = FakeSource::new(Reply::Tle);
        let store = OrbitalElementStore::new(source, cached_at(now() - Duration::hours(1)));
        let elements = store.get_orbital_elements_at(now(), false).await.unwrap();
        assert!(elements.from_cache);
        assert!(!elements.stale);
        assert_eq!(elements.line1, "1 cached");
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn entry_exactly_max_age_old_is_refetched() {
        let (source, calls) = FakeSource::new(Reply::Tle);
        let store = OrbitalElementStore::new(source, cached_at(now() - DEFAULT_MAX_AGE));
        let elements = store.get_orbital_elements_at(now(), false).await.unwrap();
        assert!(!elements.from_cache);
        assert_eq!(elements.line1, ISS_LINE1);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn force_refresh_ignores_fresh_cache() {
        let (source, calls) = FakeSource::new(Reply::Tle);
        let store = OrbitalElementStore::new(source, cached_at(now() - Duration::minutes(5)));
        let elements = store.get_orbital_elements_at(now(), true).await.unwrap();
        assert!(!elements.from_cache);
        assert_eq!(elements.fetched_at, now());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn successful_fetch_is_cached() {
        let (source, calls) = FakeSource::new(Reply::Tle);
        let store = OrbitalElementStore::new(source, MemoryCache::new());
        store.get_orbital_elements_at(now(), false).await.unwrap();
        let again = store
            .get_orbital_elements_at(now() + Duration::minutes(1), false)
            .await
            .unwrap();
        assert!(again.from_cache);
        assert_eq!(again.line2, ISS_LINE2);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn outage_falls_back_to_stale_cache() {
        let (source, _) = FakeSource::new(Reply::Down);
        let store = OrbitalElementStore::new(source, cached_at(now() - Duration::days(30)));
        let elements = store.get_orbital_elements_at(now(), false).await.unwrap();
        assert!(elements.from_cache);
        assert!(elements.stale);
        assert_eq!(elements.line1, "1 cached");
    }

    #[tokio::test]
    async fn outage_without_cache_is_unavailable() {
        let (source, _) = FakeSource::new(Reply::Down);
        let store = OrbitalElementStore::new(source, MemoryCache::new());
        let err = store.get_orbital_elements_at(now(), false).await.unwrap_err();
        assert!(matches!(err, TleError::Unavailable(_)));
    }

    #[tokio::test]
    async fn unparseable_response_is_not_cached() {
        let (source, _) = FakeSource::new(Reply::Garbage);
        let store = OrbitalElementStore::new(source, MemoryCache::new());
        let err = store.get_orbital_elements_at(now(), false).await.unwrap_err();
        assert!(matches!(err, TleError::Parse(_)));
        assert!(store.cached().is_none());
    }

    #[tokio::test]
    async fn unparseable_response_keeps_old_cache() {
        let (source, _) = FakeSource::new(Reply::Garbage);
        let store = OrbitalElementStore::new(source, cached_at(now() - Duration::days(1)));
        let elements = store.get_orbital_elements_at(now(), false).await.unwrap();
        assert!(elements.stale);
        assert_eq!(store.cached().unwrap().line1, "1 cached");
    }

    #[tokio::test]
    async fn concurrent_callers_share_one_fetch() {
        struct SlowSource(Arc<AtomicUsize>);

        #[async_trait]
        impl TleSource for SlowSource {
            async fn fetch(&self) -> Result<String, TleError> {
                self.0.fetch_add(1, Ordering::SeqCst);
                tokio::time::sleep(std::time::Duration::from_millis(50)).await;
                Ok(format!("{}\n{}\n", ISS_LINE1, ISS_LINE2))
            }
        }

        let calls = Arc::new(AtomicUsize::new(0));
        let store = OrbitalElementStore::new(SlowSource(calls.clone()), MemoryCache::new());
        let (a, b, c) = tokio::join!(
            store.get_orbital_elements_at(now(), false),
            store.get_orbital_elements_at(now(), false),
            store.get_orbital_elements_at(now(), true),
        );
        for elements in [a, b, c] {
            assert_eq!(elements.unwrap().line1, ISS_LINE1);
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn custom_max_age() {
        let (source, calls) = FakeSource::new(Reply::Tle);
        let store = OrbitalElementStore::new(source, cached_at(now() - Duration::hours(2)))
            .with_max_age(Duration::hours(1));
        store.get_orbital_elements_at(now(), false).await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn fetched_and_cached_answers_agree_on_timestamp() {
        let dir = tempfile::tempdir().unwrap();
        let (source, calls) = FakeSource::new(Reply::Tle);
        let store = OrbitalElementStore::new(
            source,
            crate::tle::FileCache::new(dir.path().join("tle_cache.json")),
        );
        let at = now() + Duration::nanoseconds(123_456_789);

        let fetched = store.get_orbital_elements_at(at, false).await.unwrap();
        assert!(!fetched.from_cache);
        assert_eq!(fetched.fetched_at, now() + Duration::milliseconds(123));

        let cached = store
            .get_orbital_elements_at(at + Duration::seconds(1), false)
            .await
            .unwrap();
        assert!(cached.from_cache);
        assert_eq!(cached.fetched_at, fetched.fetched_at);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
