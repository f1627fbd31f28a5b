//! Process-wide memoization of relevance filters.

use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::{Duration, Instant};

use lru::LruCache;
use tokio::sync::{Mutex, OnceCell};
use tracing::{debug, info};

use super::{FilterError, FilterKey, RelevanceFilter};

pub const DEFAULT_FILTER_CACHE_CAPACITY: usize = 64;

type Built<T> = (Arc<T>, Instant);
type PendingCell<T> = Arc<OnceCell<Built<T>>>;

/// Built instances live in the LRU. Constructions still in flight are kept
/// apart so eviction can never drop a key that callers are waiting on.
struct Entries<T> {
    built: LruCache<FilterKey, Built<T>>,
    pending: HashMap<FilterKey, PendingCell<T>>,
}

fn is_expired(built_at: Instant, ttl: Option<Duration>) -> bool {
    ttl.is_some_and(|ttl| built_at.elapsed() >= ttl)
}

/// Bounded LRU of shared filter instances with single-flight construction.
///
/// Concurrent callers asking for the same key wait on one construction and
/// receive the same `Arc`. A failed construction is reported to the callers
/// that awaited it and the key is left empty, so the next call retries.
pub struct FilterCache<T = RelevanceFilter> {
    entries: Mutex<Entries<T>>,
    ttl: Option<Duration>,
}

impl<T> FilterCache<T>
where
    T: Send + Sync + 'static,
{
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Mutex::new(Entries {
                built: LruCache::new(capacity),
                pending: HashMap::new(),
            }),
            ttl: None,
        }
    }

    /// Entries older than `ttl` (measured from construction) are rebuilt.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = Some(ttl);
        self
    }

    /// Returns the cached instance for `key`, building it with `build` on a
    /// blocking thread if absent or expired.
    pub async fn get_or_create<F>(&self, key: FilterKey, build: F) -> Result<Arc<T>, FilterError>
    where
        F: FnOnce() -> Result<T, FilterError> + Send + 'static,
    {
        let cell = {
            let mut entries = self.entries.lock().await;
            let expired = entries
                .built
                .peek(&key)
                .is_some_and(|(_, built_at)| is_expired(*built_at, self.ttl));
            if expired {
                debug!(ticker = %key.ticker, "filter cache entry expired");
                entries.built.pop(&key);
            }
            if let Some((instance, _)) = entries.built.get(&key) {
                return Ok(Arc::clone(instance));
            }
            Arc::clone(entries.pending.entry(key.clone()).or_default())
        };

        let result = cell
            .get_or_try_init(|| async {
                info!(
                    ticker = %key.ticker,
                    use_semantic = key.use_semantic,
                    use_local_model = key.use_local_model,
                    "constructing relevance filter"
                );
                let built = tokio::task::spawn_blocking(build)
                    .await
                    .map_err(|error| FilterError::Construction(error.to_string()))??;
                Ok::<_, FilterError>((Arc::new(built), Instant::now()))
            })
            .await;

        let mut entries = self.entries.lock().await;
        let owns_pending = entries
            .pending
            .get(&key)
            .is_some_and(|pending| Arc::ptr_eq(pending, &cell));
        if owns_pending {
            entries.pending.remove(&key);
        }

        let (instance, built_at) = result?;
        // A waiter that retried a cell another caller gave up on still
        // publishes its instance, unless a newer construction took the key.
        let promote = owns_pending
            || (!entries.pending.contains_key(&key) && !entries.built.contains(&key));
        if promote {
            if let Some((evicted, _)) = entries
                .built
                .push(key.clone(), (Arc::clone(instance), *built_at))
            {
                if evicted != key {
                    debug!(ticker = %evicted.ticker, "filter cache evicted least recently used entry");
                }
            }
        }
        Ok(Arc::clone(instance))
    }

    /// True when `key` holds a built, unexpired instance.
    pub async fn contains(&self, key: &FilterKey) -> bool {
        let entries = self.entries.lock().await;
        entries
            .built
            .peek(key)
            .is_some_and(|(_, built_at)| !is_expired(*built_at, self.ttl))
    }

    /// Number of built instances. Constructions in flight are not counted.
    pub async fn len(&self) -> usize {
        self.entries.lock().await.built.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.built.is_empty()
    }

    /// Drops every built instance. Constructions in flight still complete.
    pub async fn clear(&self) {
        self.entries.lock().await.built.clear();
    }

    pub async fn capacity(&self) -> usize {
        self.entries.lock().await.built.cap().get()
    }
}

impl<T> Default for FilterCache<T>
where
    T: Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new(DEFAULT_FILTER_CACHE_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn key(ticker: &str) -> FilterKey {
        FilterKey::new(ticker, true, false)
    }

    #[tokio::test]
    async fn same_key_returns_same_instance() {
        let cache = FilterCache::<String>::new(4);

        let first = cache
            .get_or_create(key("AAPL"), || Ok(String::from("filter")))
            .await
            .expect("builds");
        let second = cache
            .get_or_create(key("AAPL"), || Ok(String::from("other")))
            .await
            .expect("cached");

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(second.as_str(), "filter");
    }

    #[tokio::test]
    async fn least_recently_used_entry_is_evicted() {
        let cache = FilterCache::<String>::new(2);
        for ticker in ["AAPL", "MSFT", "NVDA"] {
            cache
                .get_or_create(key(ticker), move || Ok(ticker.to_owned()))
                .await
                .expect("builds");
        }

        assert_eq!(cache.len().await, 2);
        assert!(!cache.contains(&key("AAPL")).await);
        assert!(cache.contains(&key("NVDA")).await);
    }

    #[tokio::test]
    async fn failed_construction_is_not_cached() {
        let cache = FilterCache::<String>::new(4);
        let builds = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&builds);
        let err = cache
            .get_or_create(key("AAPL"), move || {
                counter.fetch_add(1, Ordering::SeqCst);
                Err(FilterError::Construction(String::from("model missing")))
            })
            .await
            .expect_err("first build fails");
        assert!(err.to_string().contains("model missing"));
        assert!(cache.is_empty().await);

        let counter = Arc::clone(&builds);
        cache
            .get_or_create(key("AAPL"), move || {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(String::from("filter"))
            })
            .await
            .expect("retry builds");
        assert_eq!(builds.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn expired_entries_are_rebuilt() {
        let cache = FilterCache::<String>::new(4).with_ttl(Duration::from_millis(50));

        let first = cache
            .get_or_create(key("AAPL"), || Ok(String::from("v1")))
            .await
            .expect("builds");
        tokio::time::sleep(Duration::from_millis(80)).await;
        assert!(!cache.contains(&key("AAPL")).await);

        let second = cache
            .get_or_create(key("AAPL"), || Ok(String::from("v2")))
            .await
            .expect("rebuilds");
        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(second.as_str(), "v2");
    }

    #[tokio::test]
    async fn zero_capacity_is_clamped_to_one() {
        let cache = FilterCache::<String>::new(0);
        assert_eq!(cache.capacity().await, 1);
    }
}
