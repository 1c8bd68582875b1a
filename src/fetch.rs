//! Read throttling and in-flight de-duplication
//!
//! Bounds read amplification against the ledger without ever changing the
//! semantic result of a query, only its timing and multiplicity:
//!
//! - a minimum refetch interval per logical query key, overridable by an
//!   explicit force/invalidate trigger;
//! - single-flight coalescing: concurrent requests for the same key share
//!   one underlying ledger call and receive the same cloned result or the
//!   same failure.
//!
//! The underlying fetch runs on its own task, so a caller abandoning
//! interest does not cancel the call for the other waiters.

use crate::error::{BookingError, Result};
use std::any::Any;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{watch, Mutex};

/// Coordinator configuration
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Minimum time between fetches of the same key, unless forced
    pub min_interval: Duration,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self { min_interval: Duration::from_secs(30) }
    }
}

/// Whether a refetch is due, given when the key was last fetched.
/// Pure form of the coordinator's keyed check.
pub fn should_fetch(last_fetch: Option<Instant>, now: Instant, min_interval: Duration) -> bool {
    match last_fetch {
        None => true,
        Some(last) => now.duration_since(last) >= min_interval,
    }
}

type SharedOutcome<T> = Option<Result<T>>;

struct CoordinatorState {
    config: FetchConfig,
    /// Last successful fetch per key
    last_fetch: Mutex<HashMap<String, Instant>>,
    /// In-flight receivers per key; values are
    /// `watch::Receiver<SharedOutcome<T>>` behind type erasure
    inflight: Mutex<HashMap<String, Box<dyn Any + Send + Sync>>>,
}

/// Throttles and de-duplicates ledger reads per logical query key.
///
/// Cheap to clone; clones share the same bookkeeping.
#[derive(Clone)]
pub struct FetchCoordinator {
    state: Arc<CoordinatorState>,
}

impl FetchCoordinator {
    pub fn new(config: FetchConfig) -> Self {
        Self {
            state: Arc::new(CoordinatorState {
                config,
                last_fetch: Mutex::new(HashMap::new()),
                inflight: Mutex::new(HashMap::new()),
            }),
        }
    }

    pub fn with_min_interval(min_interval: Duration) -> Self {
        Self::new(FetchConfig { min_interval })
    }

    /// Whether `key` is due for a refetch. `force` bypasses the interval.
    pub async fn should_fetch(&self, key: &str, force: bool) -> bool {
        if force {
            return true;
        }
        let last = self.state.last_fetch.lock().await.get(key).copied();
        should_fetch(last, Instant::now(), self.state.config.min_interval)
    }

    /// Record a successful fetch of `key` performed outside `coalesce`
    pub async fn mark_fetched(&self, key: &str) {
        self.state
            .last_fetch
            .lock()
            .await
            .insert(key.to_string(), Instant::now());
    }

    /// Explicit invalidation trigger: the next `should_fetch` for `key`
    /// reports due regardless of the interval.
    pub async fn mark_stale(&self, key: &str) {
        self.state.last_fetch.lock().await.remove(key);
    }

    /// Reset all bookkeeping to a clean state, e.g. after the gateway
    /// connection is re-established.
    pub async fn reset(&self) {
        self.state.last_fetch.lock().await.clear();
        self.state.inflight.lock().await.clear();
    }

    /// Run `fetch` for `key`, collapsing concurrent callers of the same key
    /// into one underlying call. Every caller receives the same cloned
    /// result or the same failure.
    ///
    /// The fetch future is driven by a spawned task and completes on behalf
    /// of the remaining waiters even if the initiating caller goes away.
    pub async fn coalesce<T, F, Fut>(&self, key: &str, fetch: F) -> Result<T>
    where
        T: Clone + Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>> + Send + 'static,
    {
        let mut rx = {
            let mut inflight = self.state.inflight.lock().await;
            let joined = inflight
                .get(key)
                .and_then(|entry| entry.downcast_ref::<watch::Receiver<SharedOutcome<T>>>())
                .cloned();

            match joined {
                Some(rx) => {
                    tracing::debug!(key, "joining in-flight fetch");
                    rx
                }
                None => {
                    let (tx, rx) = watch::channel::<SharedOutcome<T>>(None);
                    inflight.insert(key.to_string(), Box::new(rx.clone()));

                    let state = Arc::clone(&self.state);
                    let key = key.to_string();
                    let fut = fetch();
                    tokio::spawn(async move {
                        let outcome = fut.await;
                        state.inflight.lock().await.remove(&key);
                        if outcome.is_ok() {
                            state.last_fetch.lock().await.insert(key, Instant::now());
                        }
                        // Waiters may all have gone away; that is fine
                        let _ = tx.send(Some(outcome));
                    });
                    rx
                }
            }
        };

        loop {
            {
                let outcome = rx.borrow_and_update();
                if let Some(result) = outcome.as_ref() {
                    return result.clone();
                }
            }
            if rx.changed().await.is_err() {
                return Err(BookingError::GatewayUnavailable(
                    "coalesced fetch task dropped before resolving".into(),
                ));
            }
        }
    }
}

impl Default for FetchCoordinator {
    fn default() -> Self {
        Self::new(FetchConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn pure_should_fetch() {
        let now = Instant::now();
        let interval = Duration::from_secs(30);

        assert!(should_fetch(None, now, interval));
        assert!(!should_fetch(Some(now), now + Duration::from_secs(10), interval));
        assert!(should_fetch(Some(now), now + Duration::from_secs(30), interval));
    }

    #[tokio::test]
    async fn keyed_interval_with_force_override() {
        let coordinator = FetchCoordinator::with_min_interval(Duration::from_secs(60));

        assert!(coordinator.should_fetch("hotels", false).await);
        coordinator.mark_fetched("hotels").await;
        assert!(!coordinator.should_fetch("hotels", false).await);
        assert!(coordinator.should_fetch("hotels", true).await);

        coordinator.mark_stale("hotels").await;
        assert!(coordinator.should_fetch("hotels", false).await);
    }

    #[tokio::test]
    async fn reset_clears_timing_state() {
        let coordinator = FetchCoordinator::with_min_interval(Duration::from_secs(60));
        coordinator.mark_fetched("hotels").await;
        coordinator.reset().await;
        assert!(coordinator.should_fetch("hotels", false).await);
    }

    #[tokio::test]
    async fn concurrent_callers_share_one_call() {
        let coordinator = FetchCoordinator::default();
        let calls = Arc::new(AtomicUsize::new(0));

        let fetch = |calls: Arc<AtomicUsize>| {
            move || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(20)).await;
                Ok::<u64, BookingError>(42)
            }
        };

        let (a, b) = tokio::join!(
            coordinator.coalesce("hotels", fetch(Arc::clone(&calls))),
            coordinator.coalesce("hotels", fetch(Arc::clone(&calls))),
        );

        assert_eq!(a.unwrap(), 42);
        assert_eq!(b.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failure_shared_by_all_callers() {
        let coordinator = FetchCoordinator::default();

        let failing = || async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            Err::<u64, _>(BookingError::GatewayUnavailable("down".into()))
        };

        let (a, b) = tokio::join!(
            coordinator.coalesce("hotels", failing),
            coordinator.coalesce("hotels", failing),
        );

        let expected = BookingError::GatewayUnavailable("down".into());
        assert_eq!(a.unwrap_err(), expected);
        assert_eq!(b.unwrap_err(), expected);
    }

    #[tokio::test]
    async fn sequential_calls_fetch_again() {
        let coordinator = FetchCoordinator::default();
        let calls = Arc::new(AtomicUsize::new(0));

        for _ in 0..2 {
            let calls = Arc::clone(&calls);
            let value = coordinator
                .coalesce("rooms", move || async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok::<u64, BookingError>(7)
                })
                .await
                .unwrap();
            assert_eq!(value, 7);
        }
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn successful_coalesce_updates_last_fetch() {
        let coordinator = FetchCoordinator::with_min_interval(Duration::from_secs(60));
        coordinator
            .coalesce("hotels", || async { Ok::<u64, BookingError>(1) })
            .await
            .unwrap();
        assert!(!coordinator.should_fetch("hotels", false).await);
    }

    #[tokio::test]
    async fn abandoned_caller_does_not_cancel_the_fetch() {
        let coordinator = FetchCoordinator::default();
        let calls = Arc::new(AtomicUsize::new(0));

        let first = {
            let coordinator = coordinator.clone();
            let calls = Arc::clone(&calls);
            tokio::spawn(async move {
                coordinator
                    .coalesce("hotels", move || async move {
                        calls.fetch_add(1, Ordering::SeqCst);
                        tokio::time::sleep(Duration::from_millis(50)).await;
                        Ok::<u64, BookingError>(9)
                    })
                    .await
            })
        };

        // Let the fetch start, then abandon the initiating caller
        tokio::time::sleep(Duration::from_millis(10)).await;
        let second = coordinator.coalesce::<u64, _, _>("hotels", || async {
            unreachable!("must join the in-flight fetch")
        });
        first.abort();

        assert_eq!(second.await.unwrap(), 9);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
