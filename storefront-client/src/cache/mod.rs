//! Keyed query cache
//!
//! Reads go through [`QueryCache::fetch`]. A key maps to one slot:
//!
//! - `Loading`: a shared in-flight fetch that every concurrent reader of the
//!   key joins, so one request serves all of them.
//! - `Ready`: the last value, served until it is older than the stale time
//!   or has been invalidated.
//! - `Failed`: the last error. Never served; the next read refetches.
//!
//! Fetches run on spawned tasks. A reader dropping its future does not
//! abort the request, and the result still lands in the cache unless the
//! slot was invalidated or removed in the meantime (tracked by a generation
//! number per fetch).

mod key;
mod retry;

pub use key::QueryKey;
pub use retry::RetryPolicy;

use std::any::Any;
use std::future::Future;
use std::sync::Arc;
use std::sync::Weak;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use tokio::sync::broadcast;
use tracing::debug;

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};

type Value = Arc<dyn Any + Send + Sync>;
type SharedFetch = Shared<BoxFuture<'static, Result<Value, ClientError>>>;

enum Slot {
    Loading {
        generation: u64,
        fetch: SharedFetch,
    },
    Ready {
        value: Value,
        fetched_at: Instant,
        stale: bool,
    },
    Failed {
        error: ClientError,
    },
}

/// Change notification for subscribers
#[derive(Debug, Clone, PartialEq)]
pub enum CacheEvent {
    /// A fetch settled successfully and was stored
    Updated(QueryKey),
    /// Keys under the prefix were marked stale or detached
    Invalidated(QueryKey),
    /// Keys under the prefix were dropped
    Removed(QueryKey),
    /// A fetch settled with an error
    Failed { key: QueryKey, error: ClientError },
}

/// Observable state of one key
#[derive(Debug, Clone, PartialEq)]
pub enum QueryStatus {
    Idle,
    Loading,
    Ready { stale: bool, age: Duration },
    Failed(ClientError),
}

struct Inner {
    slots: DashMap<QueryKey, Slot>,
    next_generation: AtomicU64,
    stale_time: Duration,
    retry: RetryPolicy,
    events: broadcast::Sender<CacheEvent>,
}

impl Inner {
    /// Store a settled result if the slot still belongs to this fetch
    fn settle(&self, key: &QueryKey, generation: u64, result: &Result<Value, ClientError>) {
        let event = match self.slots.get_mut(key) {
            Some(mut slot)
                if matches!(&*slot, Slot::Loading { generation: g, .. } if *g == generation) =>
            {
                match result {
                    Ok(value) => {
                        *slot = Slot::Ready {
                            value: value.clone(),
                            fetched_at: Instant::now(),
                            stale: false,
                        };
                        CacheEvent::Updated(key.clone())
                    }
                    Err(error) => {
                        *slot = Slot::Failed {
                            error: error.clone(),
                        };
                        CacheEvent::Failed {
                            key: key.clone(),
                            error: error.clone(),
                        }
                    }
                }
            }
            _ => {
                debug!(query = %key, generation, "discarding result of detached fetch");
                return;
            }
        };
        debug!(query = %key, generation, ok = result.is_ok(), "fetch settled");
        let _ = self.events.send(event);
    }
}

enum Lookup {
    Hit(Value),
    Pending(SharedFetch),
}

/// Keyed cache with in-flight coalescing
///
/// Cloning shares the same cache.
#[derive(Clone)]
pub struct QueryCache {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for QueryCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryCache")
            .field("keys", &self.inner.slots.len())
            .field("stale_time", &self.inner.stale_time)
            .field("retry", &self.inner.retry)
            .finish()
    }
}

impl QueryCache {
    pub fn new(stale_time: Duration, retry: RetryPolicy, event_capacity: usize) -> Self {
        let (events, _) = broadcast::channel(event_capacity.max(1));
        Self {
            inner: Arc::new(Inner {
                slots: DashMap::new(),
                next_generation: AtomicU64::new(1),
                stale_time,
                retry,
                events,
            }),
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(config.stale_time, config.retry.clone(), config.event_capacity)
    }

    pub fn stale_time(&self) -> Duration {
        self.inner.stale_time
    }

    /// Read `key`, fetching with `fetcher` unless a fresh value is cached
    ///
    /// Concurrent calls for the same key share one fetch and all receive
    /// its result. Transient failures are retried per the retry policy.
    pub async fn fetch<T, F, Fut>(&self, key: QueryKey, fetcher: F) -> ClientResult<T>
    where
        T: Clone + Send + Sync + 'static,
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ClientResult<T>> + Send + 'static,
    {
        let value = match self.lookup_or_start(&key, fetcher) {
            Lookup::Hit(value) => value,
            Lookup::Pending(fetch) => fetch.await?,
        };
        downcast(&key, &value)
    }

    fn lookup_or_start<T, F, Fut>(&self, key: &QueryKey, fetcher: F) -> Lookup
    where
        T: Clone + Send + Sync + 'static,
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ClientResult<T>> + Send + 'static,
    {
        match self.inner.slots.entry(key.clone()) {
            Entry::Occupied(mut occupied) => {
                let existing = match occupied.get() {
                    Slot::Ready {
                        value,
                        fetched_at,
                        stale,
                    } if !*stale && fetched_at.elapsed() < self.inner.stale_time => {
                        Some(Lookup::Hit(value.clone()))
                    }
                    Slot::Loading { fetch, .. } => Some(Lookup::Pending(fetch.clone())),
                    _ => None,
                };
                match existing {
                    Some(Lookup::Hit(value)) => {
                        debug!(query = %key, "cache hit");
                        Lookup::Hit(value)
                    }
                    Some(Lookup::Pending(fetch)) => {
                        debug!(query = %key, "joining in-flight fetch");
                        Lookup::Pending(fetch)
                    }
                    None => {
                        let (generation, fetch) = self.start(key, fetcher);
                        occupied.insert(Slot::Loading {
                            generation,
                            fetch: fetch.clone(),
                        });
                        Lookup::Pending(fetch)
                    }
                }
            }
            Entry::Vacant(vacant) => {
                let (generation, fetch) = self.start(key, fetcher);
                vacant.insert(Slot::Loading {
                    generation,
                    fetch: fetch.clone(),
                });
                Lookup::Pending(fetch)
            }
        }
    }

    /// Build the shared fetch for a new generation
    ///
    /// The task is spawned on first poll, after the map guard is released.
    fn start<T, F, Fut>(&self, key: &QueryKey, fetcher: F) -> (u64, SharedFetch)
    where
        T: Clone + Send + Sync + 'static,
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ClientResult<T>> + Send + 'static,
    {
        let generation = self.inner.next_generation.fetch_add(1, Ordering::Relaxed);
        let retry = self.inner.retry.clone();
        let weak: Weak<Inner> = Arc::downgrade(&self.inner);
        let key = key.clone();
        debug!(query = %key, generation, "starting fetch");

        let fetch = async move {
            let task_key = key.clone();
            let task_cache = weak.clone();
            let task = tokio::spawn(async move {
                let label = task_key.to_string();
                let result = retry
                    .run(&label, fetcher)
                    .await
                    .map(|value| Arc::new(value) as Value);
                if let Some(inner) = task_cache.upgrade() {
                    inner.settle(&task_key, generation, &result);
                }
                result
            });

            match task.await {
                Ok(result) => result,
                Err(err) => {
                    let result = Err(ClientError::Internal(format!("Fetch task failed: {}", err)));
                    if let Some(inner) = weak.upgrade() {
                        inner.settle(&key, generation, &result);
                    }
                    result
                }
            }
        }
        .boxed()
        .shared();

        (generation, fetch)
    }

    /// Mark every key under `prefix` stale
    ///
    /// In-flight fetches under the prefix are detached: their callers still
    /// get the result, but it is not stored. Returns the number of keys hit.
    pub fn invalidate(&self, prefix: &QueryKey) -> usize {
        let mut touched = 0;
        self.inner.slots.retain(|key, slot| {
            if !key.starts_with(prefix) {
                return true;
            }
            touched += 1;
            match slot {
                Slot::Ready { stale, .. } => {
                    *stale = true;
                    true
                }
                Slot::Loading { .. } => false,
                Slot::Failed { .. } => true,
            }
        });
        debug!(prefix = %prefix, keys = touched, "invalidated");
        let _ = self.inner.events.send(CacheEvent::Invalidated(prefix.clone()));
        touched
    }

    /// Drop every key under `prefix` without refetching
    pub fn remove(&self, prefix: &QueryKey) -> usize {
        let before = self.inner.slots.len();
        self.inner.slots.retain(|key, _| !key.starts_with(prefix));
        let removed = before.saturating_sub(self.inner.slots.len());
        debug!(prefix = %prefix, keys = removed, "removed");
        let _ = self.inner.events.send(CacheEvent::Removed(prefix.clone()));
        removed
    }

    /// Drop everything
    pub fn clear(&self) {
        self.inner.slots.clear();
        let _ = self
            .inner
            .events
            .send(CacheEvent::Removed(QueryKey::new(Vec::<String>::new())));
    }

    pub fn status(&self, key: &QueryKey) -> QueryStatus {
        match self.inner.slots.get(key).as_deref() {
            None => QueryStatus::Idle,
            Some(Slot::Loading { .. }) => QueryStatus::Loading,
            Some(Slot::Ready {
                fetched_at, stale, ..
            }) => {
                let age = fetched_at.elapsed();
                QueryStatus::Ready {
                    stale: *stale || age >= self.inner.stale_time,
                    age,
                }
            }
            Some(Slot::Failed { error }) => QueryStatus::Failed(error.clone()),
        }
    }

    /// Last stored value for `key`, stale or not
    pub fn peek<T: Clone + 'static>(&self, key: &QueryKey) -> Option<T> {
        match self.inner.slots.get(key).as_deref() {
            Some(Slot::Ready { value, .. }) => value.downcast_ref::<T>().cloned(),
            _ => None,
        }
    }

    /// Stored keys under `prefix` whose value is a `T` satisfying `pred`
    pub fn matching<T: 'static>(&self, prefix: &QueryKey, pred: impl Fn(&T) -> bool) -> Vec<QueryKey> {
        self.inner
            .slots
            .iter()
            .filter(|entry| entry.key().starts_with(prefix))
            .filter_map(|entry| match entry.value() {
                Slot::Ready { value, .. } => value
                    .downcast_ref::<T>()
                    .filter(|value| pred(*value))
                    .map(|_| entry.key().clone()),
                _ => None,
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.inner.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.slots.is_empty()
    }

    /// Subscribe to cache events
    pub fn subscribe(&self) -> broadcast::Receiver<CacheEvent> {
        self.inner.events.subscribe()
    }
}

fn downcast<T: Clone + 'static>(key: &QueryKey, value: &Value) -> ClientResult<T> {
    value.downcast_ref::<T>().cloned().ok_or_else(|| {
        ClientError::InvalidResponse(format!("Cached value for {} has an unexpected type", key))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicU32;
    use tokio::sync::Notify;

    fn cache() -> QueryCache {
        QueryCache::new(
            Duration::from_secs(60),
            RetryPolicy::default().with_backoff(Duration::from_millis(1), Duration::from_millis(2)),
            16,
        )
    }

    fn counting(counter: &Arc<AtomicU32>, value: u32) -> impl FnMut() -> futures::future::Ready<ClientResult<u32>> + Send + 'static {
        let counter = counter.clone();
        move || {
            counter.fetch_add(1, Ordering::SeqCst);
            futures::future::ready(Ok(value))
        }
    }

    #[tokio::test]
    async fn test_fresh_value_is_served_from_cache() {
        let cache = cache();
        let calls = Arc::new(AtomicU32::new(0));
        let key = QueryKey::from(["brand", "1"]);

        assert_eq!(cache.fetch(key.clone(), counting(&calls, 7)).await, Ok(7));
        assert_eq!(cache.fetch(key.clone(), counting(&calls, 8)).await, Ok(7));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.peek::<u32>(&key), Some(7));
    }

    #[tokio::test]
    async fn test_concurrent_reads_share_one_fetch() {
        let cache = cache();
        let calls = Arc::new(AtomicU32::new(0));
        let gate = Arc::new(Notify::new());
        let key = QueryKey::from(["brands", "0", "12", "name,asc"]);

        let fetcher = {
            let calls = calls.clone();
            let gate = gate.clone();
            move || {
                calls.fetch_add(1, Ordering::SeqCst);
                let gate = gate.clone();
                async move {
                    gate.notified().await;
                    Ok::<_, ClientError>(vec!["Acme".to_string()])
                }
            }
        };

        let first = tokio::spawn({
            let cache = cache.clone();
            let key = key.clone();
            let fetcher = fetcher.clone();
            async move { cache.fetch(key, fetcher).await }
        });
        let second = tokio::spawn({
            let cache = cache.clone();
            let key = key.clone();
            async move { cache.fetch(key, fetcher).await }
        });

        while calls.load(Ordering::SeqCst) == 0 {
            tokio::task::yield_now().await;
        }
        assert_eq!(cache.status(&key), QueryStatus::Loading);
        gate.notify_one();

        let a = first.await.unwrap().unwrap();
        let b = second.await.unwrap().unwrap();
        assert_eq!(a, b);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_invalidate_marks_ready_slots_stale() {
        let cache = cache();
        let calls = Arc::new(AtomicU32::new(0));
        let page = QueryKey::from(["categories", "0", "12", ""]);
        let other = QueryKey::from(["brands", "0", "12", ""]);

        cache.fetch(page.clone(), counting(&calls, 1)).await.unwrap();
        cache.fetch(other.clone(), counting(&calls, 1)).await.unwrap();
        assert_eq!(cache.invalidate(&QueryKey::from(["categories"])), 1);

        assert!(matches!(cache.status(&page), QueryStatus::Ready { stale: true, .. }));
        assert!(matches!(cache.status(&other), QueryStatus::Ready { stale: false, .. }));
        assert_eq!(cache.peek::<u32>(&page), Some(1));

        assert_eq!(cache.fetch(page.clone(), counting(&calls, 2)).await, Ok(2));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_remove_drops_keys() {
        let cache = cache();
        let calls = Arc::new(AtomicU32::new(0));
        let key = QueryKey::from(["brand", "9"]);

        cache.fetch(key.clone(), counting(&calls, 1)).await.unwrap();
        assert_eq!(cache.remove(&QueryKey::from(["brand", "9"])), 1);
        assert_eq!(cache.status(&key), QueryStatus::Idle);
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_invalidated_in_flight_result_is_not_stored() {
        let cache = cache();
        let gate = Arc::new(Notify::new());
        let key = QueryKey::from(["wishlists"]);

        let pending = tokio::spawn({
            let cache = cache.clone();
            let key = key.clone();
            let gate = gate.clone();
            async move {
                cache
                    .fetch(key, move || {
                        let gate = gate.clone();
                        async move {
                            gate.notified().await;
                            Ok::<_, ClientError>(1u32)
                        }
                    })
                    .await
            }
        });

        while cache.status(&key) != QueryStatus::Loading {
            tokio::task::yield_now().await;
        }
        cache.invalidate(&key);
        assert_eq!(cache.status(&key), QueryStatus::Idle);

        gate.notify_one();
        assert_eq!(pending.await.unwrap(), Ok(1));
        assert_eq!(cache.status(&key), QueryStatus::Idle);
    }

    #[tokio::test]
    async fn test_failure_is_shared_and_not_served() {
        let cache = cache();
        let calls = Arc::new(AtomicU32::new(0));
        let key = QueryKey::from(["reviews", "p-1", "0", "5"]);
        let mut events = cache.subscribe();

        let failing = {
            let calls = calls.clone();
            move || {
                calls.fetch_add(1, Ordering::SeqCst);
                futures::future::ready(Err::<u32, _>(ClientError::AuthenticationRequired))
            }
        };
        assert_eq!(
            cache.fetch(key.clone(), failing).await,
            Err(ClientError::AuthenticationRequired)
        );
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(
            cache.status(&key),
            QueryStatus::Failed(ClientError::AuthenticationRequired)
        );
        assert!(matches!(events.recv().await, Ok(CacheEvent::Failed { .. })));

        assert_eq!(cache.fetch(key.clone(), counting(&calls, 3)).await, Ok(3));
        assert_eq!(events.recv().await, Ok(CacheEvent::Updated(key)));
    }

    #[tokio::test]
    async fn test_concurrent_rejection_is_shared() {
        let cache = cache();
        let calls = Arc::new(AtomicU32::new(0));
        let gate = Arc::new(Notify::new());
        let key = QueryKey::from(["brand", "missing"]);
        let rejection = ClientError::rejected("Fetch brand", 404, Some("Brand not found".into()));

        let fetcher = {
            let calls = calls.clone();
            let gate = gate.clone();
            let rejection = rejection.clone();
            move || {
                calls.fetch_add(1, Ordering::SeqCst);
                let gate = gate.clone();
                let rejection = rejection.clone();
                async move {
                    gate.notified().await;
                    Err::<u32, _>(rejection)
                }
            }
        };

        let first = tokio::spawn({
            let cache = cache.clone();
            let key = key.clone();
            let fetcher = fetcher.clone();
            async move { cache.fetch(key, fetcher).await }
        });
        let second = tokio::spawn({
            let cache = cache.clone();
            let key = key.clone();
            async move { cache.fetch(key, fetcher).await }
        });

        while calls.load(Ordering::SeqCst) == 0 {
            tokio::task::yield_now().await;
        }
        gate.notify_one();

        let a = first.await.unwrap();
        let b = second.await.unwrap();
        assert_eq!(a, Err(rejection.clone()));
        assert_eq!(a, b);
        // 4xx is not retried
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.status(&key), QueryStatus::Failed(rejection));
    }

    #[tokio::test]
    async fn test_matching_scans_ready_values() {
        let cache = cache();
        let calls = Arc::new(AtomicU32::new(0));
        let a = QueryKey::from(["category", "slug", "boots"]);
        let b = QueryKey::from(["category", "slug", "hats"]);
        let other = QueryKey::from(["category", "c-1"]);

        cache.fetch(a.clone(), counting(&calls, 1)).await.unwrap();
        cache.fetch(b.clone(), counting(&calls, 2)).await.unwrap();
        cache.fetch(other, counting(&calls, 1)).await.unwrap();

        let prefix = QueryKey::from(["category", "slug"]);
        assert_eq!(cache.matching::<u32>(&prefix, |v| *v == 1), vec![a]);
        assert!(cache.matching::<String>(&prefix, |_| true).is_empty());
        assert_eq!(cache.matching::<u32>(&prefix, |_| true).len(), 2);
    }

    #[tokio::test]
    async fn test_type_mismatch_is_reported() {
        let cache = cache();
        let calls = Arc::new(AtomicU32::new(0));
        let key = QueryKey::from(["user", "1"]);

        cache.fetch(key.clone(), counting(&calls, 1)).await.unwrap();
        let err = cache
            .fetch(key, || futures::future::ready(Ok::<_, ClientError>("x".to_string())))
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_zero_stale_time_always_refetches() {
        let cache = QueryCache::new(Duration::ZERO, RetryPolicy::none(), 4);
        let calls = Arc::new(AtomicU32::new(0));
        let key = QueryKey::from(["brand", "2"]);

        cache.fetch(key.clone(), counting(&calls, 1)).await.unwrap();
        cache.fetch(key.clone(), counting(&calls, 1)).await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
