// src/cache.rs
use std::{
    collections::HashMap,
    future::Future,
    sync::RwLock,
    time::{Duration, Instant},
};
use tracing::debug;

/// Thread-safe key → (value, inserted_at) store whose entries expire after `ttl`.
///
/// Every lookup takes the current time as an argument in its `*_at` form, so
/// expiry can be exercised without sleeping.
pub struct TtlCache<V> {
    ttl: Duration,
    entries: RwLock<HashMap<String, (V, Instant)>>,
}

impl<V: Clone> TtlCache<V> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn get(&self, key: &str) -> Option<V> {
        self.get_at(key, Instant::now())
    }

    /// The value for `key` if it was inserted less than `ttl` before `now`.
    pub fn get_at(&self, key: &str, now: Instant) -> Option<V> {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        let (value, inserted) = entries.get(key)?;
        (now.saturating_duration_since(*inserted) < self.ttl).then(|| value.clone())
    }

    pub fn insert(&self, key: &str, value: V) {
        self.insert_at(key, value, Instant::now());
    }

    pub fn insert_at(&self, key: &str, value: V, now: Instant) {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries.insert(key.to_string(), (value, now));
    }

    pub fn invalidate(&self, key: &str) {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries.remove(key);
    }

    /// Return the fresh cached value, or run `fetch` and cache what it returns.
    /// Errors are passed through and not cached.
    pub async fn get_or_try_insert_with<F, Fut, E>(&self, key: &str, fetch: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        if let Some(v) = self.get(key) {
            debug!(key, "cache hit");
            return Ok(v);
        }
        debug!(key, "cache miss");
        let value = fetch().await?;
        self.insert(key, value.clone());
        Ok(value)
    }
}
