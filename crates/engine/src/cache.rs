use core_types::PriceSeries;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

/// Identifies one (strategy, instrument) series.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SeriesKey {
    pub strategy_id: String,
    pub instrument: String,
}

impl SeriesKey {
    pub fn new(strategy_id: &str, instrument: &str) -> Self {
        Self {
            strategy_id: strategy_id.to_string(),
            instrument: instrument.to_string(),
        }
    }
}

/// Memoized full-length series, owned by one engine instance.
///
/// Entries are never evicted or replaced. `get_or_insert_with` runs its
/// producer at most once per key, even when the cache is shared across threads.
#[derive(Debug, Default)]
pub struct SeriesCache {
    entries: RwLock<HashMap<SeriesKey, Arc<PriceSeries>>>,
}

impl SeriesCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &SeriesKey) -> Option<Arc<PriceSeries>> {
        // Entries are only ever inserted whole, so a poisoned map is still consistent.
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries.get(key).cloned()
    }

    pub fn get_or_insert_with<F>(&self, key: SeriesKey, produce: F) -> Arc<PriceSeries>
    where
        F: FnOnce() -> PriceSeries,
    {
        if let Some(hit) = self.get(&key) {
            return hit;
        }

        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        // Another caller may have filled the slot between the two locks.
        if let Some(hit) = entries.get(&key) {
            return Arc::clone(hit);
        }
        tracing::debug!(
            strategy = %key.strategy_id,
            instrument = %key.instrument,
            "Series cache miss."
        );
        let series = Arc::new(produce());
        entries.insert(key, Arc::clone(&series));
        series
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;

    #[test]
    fn producer_runs_once_per_key() {
        let cache = SeriesCache::new();
        let calls = AtomicUsize::new(0);
        let produce = || {
            calls.fetch_add(1, Ordering::SeqCst);
            PriceSeries::default()
        };

        let a = cache.get_or_insert_with(SeriesKey::new("S001", "SPY"), produce);
        let b = cache.get_or_insert_with(SeriesKey::new("S001", "SPY"), produce);
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        cache.get_or_insert_with(SeriesKey::new("S001", "QQQ"), produce);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn concurrent_callers_share_one_generation() {
        let cache = SeriesCache::new();
        let calls = AtomicUsize::new(0);

        thread::scope(|scope| {
            for _ in 0..8 {
                scope.spawn(|| {
                    cache.get_or_insert_with(SeriesKey::new("S002", "GLD"), || {
                        calls.fetch_add(1, Ordering::SeqCst);
                        PriceSeries::default()
                    })
                });
            }
        });

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.len(), 1);
    }
}
