use std::hash::Hash;
use std::sync::Arc;

use quick_cache::sync::Cache as Store;
use tokio::time::{Duration, Instant};

const CAPACITY: usize = 256;

pub struct Config {
    pub enabled: bool,
    pub ttl: Duration,
}

/// Query results kept for `ttl` after they were fetched.
pub struct Cache<K, V> {
    enabled: bool,
    inner: Store<K, (Instant, Arc<V>)>,
    ttl: Duration,
}

impl<K, V> Cache<K, V>
where
    K: Clone + Eq + Hash,
{
    pub fn new(config: Config) -> Arc<Self> {
        Arc::new(Self {
            enabled: config.enabled,
            ttl: config.ttl,
            inner: Store::new(CAPACITY),
        })
    }

    pub fn insert(&self, key: K, value: V) -> Arc<V> {
        let arcd = Arc::new(value);
        if !self.enabled {
            return arcd;
        }

        self.inner.insert(key, (Instant::now(), Arc::clone(&arcd)));
        arcd
    }

    pub fn get(&self, key: &K) -> Option<Arc<V>> {
        if !self.enabled {
            return None;
        }

        let (inserted, value) = self.inner.get(key)?;
        if inserted.elapsed() >= self.ttl {
            self.inner.remove(key);
            return None;
        }

        Some(value)
    }

    pub fn clear(&self) {
        self.inner.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cache(enabled: bool) -> Arc<Cache<&'static str, u32>> {
        Cache::new(Config {
            enabled,
            ttl: Duration::from_secs(60),
        })
    }

    #[tokio::test(start_paused = true)]
    async fn entries_expire_after_ttl() {
        let cache = cache(true);
        cache.insert("week", 3);

        tokio::time::advance(Duration::from_secs(59)).await;
        assert_eq!(cache.get(&"week").as_deref(), Some(&3));

        tokio::time::advance(Duration::from_secs(1)).await;
        assert_eq!(cache.get(&"week"), None);
    }

    #[tokio::test]
    async fn disabled_cache_stores_nothing() {
        let cache = cache(false);

        assert_eq!(*cache.insert("week", 3), 3);
        assert_eq!(cache.get(&"week"), None);
    }

    #[tokio::test]
    async fn clear_drops_everything() {
        let cache = cache(true);
        cache.insert("week", 3);
        cache.insert("month", 9);

        cache.clear();

        assert_eq!(cache.get(&"week"), None);
        assert_eq!(cache.get(&"month"), None);
    }
}
