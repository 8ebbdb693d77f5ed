//! Bounded, content-addressed result cache.
//!
//! A `HashMap` from content hash to result plus a `BTreeMap` eviction index
//! ordered by a logical clock. Both live behind one `Mutex`, so the map and
//! the index can never disagree. Concurrent writers of the same key resolve
//! last-writer-wins.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::config::CachePolicy;
use crate::result::ValidationResult;

#[derive(Debug, Default)]
struct CacheInner {
    /// key → (result, tick of its eviction-index entry)
    entries: HashMap<String, (ValidationResult, u64)>,
    /// tick → key; the smallest tick is evicted first.
    order: BTreeMap<u64, String>,
    clock: u64,
}

impl CacheInner {
    fn touch(&mut self, key: &str) {
        self.clock += 1;
        let clock = self.clock;
        if let Some((_, tick)) = self.entries.get_mut(key) {
            self.order.remove(&*tick);
            *tick = clock;
            self.order.insert(clock, key.to_string());
        }
    }
}

/// Thread-safe bounded map from level content hash to [`ValidationResult`].
#[derive(Debug)]
pub struct ValidationCache {
    inner: Mutex<CacheInner>,
    capacity: usize,
    policy: CachePolicy,
}

impl ValidationCache {
    #[must_use]
    pub fn new(capacity: usize, policy: CachePolicy) -> Self {
        Self {
            inner: Mutex::new(CacheInner::default()),
            capacity,
            policy,
        }
    }

    fn lock(&self) -> MutexGuard<'_, CacheInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Look up `key`. Under [`CachePolicy::Lru`] a hit refreshes recency.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<ValidationResult> {
        let mut inner = self.lock();
        let found = inner.entries.get(key).map(|(result, _)| result.clone())?;
        if self.policy == CachePolicy::Lru {
            inner.touch(key);
        }
        Some(found)
    }

    /// Store `result` under `key`, evicting first if the cache is full.
    ///
    /// Replacing an existing key never evicts. A zero-capacity cache
    /// stores nothing.
    pub fn put(&self, key: &str, result: ValidationResult) {
        if self.capacity == 0 {
            return;
        }
        let mut inner = self.lock();
        if let Some(entry) = inner.entries.get_mut(key) {
            entry.0 = result;
            if self.policy == CachePolicy::Lru {
                inner.touch(key);
            }
            return;
        }
        while inner.entries.len() >= self.capacity {
            let Some((_, victim)) = inner.order.pop_first() else {
                break;
            };
            inner.entries.remove(&victim);
        }
        inner.clock += 1;
        let tick = inner.clock;
        inner.order.insert(tick, key.to_string());
        inner.entries.insert(key.to_string(), (result, tick));
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&self) {
        let mut inner = self.lock();
        inner.entries.clear();
        inner.order.clear();
    }
}
