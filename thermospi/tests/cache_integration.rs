//! Integration tests for the background-refresh temperature cache.
//!
//! These tests drive the cache with scripted sources and verify:
//! - the end-to-end snapshot sequence (success, error, recovery)
//! - tick cadence against the configured interval
//! - that slow acquisitions are bounded and never overlap
//! - close semantics, including the double-close fault
//! - snapshot consistency under concurrent readers
//!
//! Run with: `cargo test --test cache_integration`

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use thermospi::cache::{CacheConfig, CacheError, TemperatureCache};
use thermospi::source::{SourceError, TemperatureSource};

// ============================================================================
// Test Helpers
// ============================================================================

/// Source that replays a fixed script of outcomes, repeating the last
/// entry once the script is exhausted.
struct ScriptedSource {
    script: Vec<Result<f64, &'static str>>,
    cursor: AtomicUsize,
}

impl ScriptedSource {
    fn new(script: Vec<Result<f64, &'static str>>) -> Self {
        assert!(!script.is_empty());
        Self {
            script,
            cursor: AtomicUsize::new(0),
        }
    }
}

impl TemperatureSource for ScriptedSource {
    async fn degs_c(&self) -> Result<f64, SourceError> {
        let idx = self
            .cursor
            .fetch_add(1, Ordering::SeqCst)
            .min(self.script.len() - 1);
        match self.script[idx] {
            Ok(value) => Ok(value),
            Err(message) => Err(SourceError::Read {
                path: "scripted".into(),
                source: std::io::Error::other(message),
            }),
        }
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

/// Source that counts acquisitions and always succeeds.
struct CountingSource {
    calls: Arc<AtomicUsize>,
}

impl TemperatureSource for CountingSource {
    async fn degs_c(&self) -> Result<f64, SourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(21.5)
    }

    fn name(&self) -> &str {
        "counting"
    }
}

/// Source that takes longer than the acquisition bound and tracks how
/// many acquisitions are ever in flight at once.
struct SlowSource {
    in_flight: Arc<AtomicUsize>,
    max_seen: Arc<AtomicUsize>,
}

impl TemperatureSource for SlowSource {
    async fn degs_c(&self) -> Result<f64, SourceError> {
        struct InFlight(Arc<AtomicUsize>);
        impl Drop for InFlight {
            fn drop(&mut self) {
                self.0.fetch_sub(1, Ordering::SeqCst);
            }
        }

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_seen.fetch_max(now, Ordering::SeqCst);
        let _guard = InFlight(Arc::clone(&self.in_flight));

        tokio::time::sleep(Duration::from_millis(250)).await;
        Ok(22.0)
    }

    fn name(&self) -> &str {
        "slow"
    }
}

const INTERVAL: Duration = Duration::from_millis(100);

fn config() -> CacheConfig {
    CacheConfig::default()
        .with_poll_interval(INTERVAL)
        .with_acquire_timeout(INTERVAL)
}

// ============================================================================
// End-to-End Snapshot Sequence
// ============================================================================

#[tokio::test(start_paused = true)]
async fn snapshot_sequence_retains_last_good_reading() {
    let source = ScriptedSource::new(vec![Ok(23.4), Err("bus error"), Ok(25.0)]);
    let cache = TemperatureCache::spawn(source, config()).unwrap();

    // After tick 1: populated, no error.
    tokio::time::sleep(Duration::from_millis(50)).await;
    let snap = cache.current();
    let first = snap.reading.expect("populated after first tick");
    assert_eq!(first.degs_c, 23.4);
    assert!(!snap.has_error());

    // After tick 2: the failed acquisition keeps the first reading,
    // timestamp included, with the error attached.
    tokio::time::sleep(Duration::from_millis(100)).await;
    let snap = cache.current();
    let retained = snap.reading.expect("last good reading retained");
    assert_eq!(retained, first);
    let error = snap.error.expect("error recorded");
    assert!(error.contains("bus error"), "unexpected error: {error}");

    // After tick 3: recovery clears the error marker.
    tokio::time::sleep(Duration::from_millis(100)).await;
    let snap = cache.current();
    assert_eq!(snap.reading.unwrap().degs_c, 25.0);
    assert!(!snap.has_error());

    cache.close().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn unpopulated_until_the_first_tick_lands() {
    // An acquisition that never resolves within the bound keeps the
    // snapshot unpopulated but records the timeout.
    let source = SlowSource {
        in_flight: Arc::new(AtomicUsize::new(0)),
        max_seen: Arc::new(AtomicUsize::new(0)),
    };
    let cache = TemperatureCache::spawn(source, config()).unwrap();

    let snap = cache.current();
    assert!(!snap.is_populated());
    assert!(!snap.has_error());

    tokio::time::sleep(Duration::from_millis(150)).await;
    let snap = cache.current();
    assert!(!snap.is_populated());
    let error = snap.error.expect("timeout recorded");
    assert!(error.contains("timed out"), "unexpected error: {error}");

    cache.close().await.unwrap();
}

// ============================================================================
// Scheduling
// ============================================================================

#[tokio::test(start_paused = true)]
async fn ticks_follow_the_configured_interval() {
    let calls = Arc::new(AtomicUsize::new(0));
    let source = CountingSource {
        calls: Arc::clone(&calls),
    };
    let cache = TemperatureCache::spawn(source, config()).unwrap();

    tokio::time::sleep(Duration::from_millis(1050)).await;

    let n = calls.load(Ordering::SeqCst);
    assert!((10..=12).contains(&n), "expected ~11 ticks, got {n}");

    cache.close().await.unwrap();
    let after_close = calls.load(Ordering::SeqCst);
    tokio::time::sleep(Duration::from_millis(300)).await;
    assert_eq!(
        calls.load(Ordering::SeqCst),
        after_close,
        "no ticks after close"
    );
}

#[tokio::test(start_paused = true)]
async fn slow_acquisitions_are_bounded_and_never_overlap() {
    let in_flight = Arc::new(AtomicUsize::new(0));
    let max_seen = Arc::new(AtomicUsize::new(0));
    let source = SlowSource {
        in_flight: Arc::clone(&in_flight),
        max_seen: Arc::clone(&max_seen),
    };
    let cache = TemperatureCache::spawn(source, config()).unwrap();

    tokio::time::sleep(Duration::from_secs(1)).await;

    assert_eq!(
        max_seen.load(Ordering::SeqCst),
        1,
        "acquisitions from one loop must never overlap"
    );

    cache.close().await.unwrap();
}

// ============================================================================
// Lifecycle
// ============================================================================

#[tokio::test]
async fn close_is_reported_once_and_reads_stay_available() {
    let source = ScriptedSource::new(vec![Ok(23.4)]);
    let cache = TemperatureCache::spawn(
        source,
        CacheConfig::default()
            .with_poll_interval(Duration::from_millis(10))
            .with_acquire_timeout(Duration::from_millis(10)),
    )
    .unwrap();

    tokio::time::sleep(Duration::from_millis(100)).await;
    cache.close().await.unwrap();

    // The frozen snapshot stays readable, without blocking.
    for _ in 0..100 {
        let snap = cache.current();
        assert_eq!(snap.reading.unwrap().degs_c, 23.4);
    }

    // Closing twice is a fault, not a hang.
    assert!(matches!(
        cache.close().await,
        Err(CacheError::AlreadyClosed)
    ));
}

#[tokio::test]
async fn zero_interval_is_rejected_at_spawn() {
    let source = ScriptedSource::new(vec![Ok(20.0)]);
    let err = TemperatureCache::spawn(
        source,
        CacheConfig::default().with_poll_interval(Duration::ZERO),
    )
    .unwrap_err();
    assert!(matches!(err, CacheError::InvalidInterval));
}

// ============================================================================
// Concurrency
// ============================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_reads_see_consistent_snapshots() {
    // Alternate success and failure so the snapshot keeps changing while
    // the readers hammer it.
    let script = (0..64)
        .map(|i| if i % 2 == 0 { Ok(23.4) } else { Err("flaky bus") })
        .collect();
    let source = ScriptedSource::new(script);
    let cache = Arc::new(
        TemperatureCache::spawn(
            source,
            CacheConfig::default()
                .with_poll_interval(Duration::from_millis(5))
                .with_acquire_timeout(Duration::from_millis(5)),
        )
        .unwrap(),
    );

    let mut readers = Vec::new();
    for _ in 0..8 {
        let cache = Arc::clone(&cache);
        readers.push(tokio::spawn(async move {
            for _ in 0..200 {
                let snap = cache.current();
                // The only value ever published is 23.4; a torn read
                // would surface as a default or mixed value.
                if let Some(reading) = snap.reading {
                    assert_eq!(reading.degs_c, 23.4);
                }
                // An error marker always rides on a retained reading,
                // because the script leads with a success.
                if snap.has_error() {
                    assert!(snap.is_populated());
                }
                tokio::task::yield_now().await;
            }
        }));
    }

    for reader in readers {
        reader.await.unwrap();
    }

    cache.close().await.unwrap();
}
