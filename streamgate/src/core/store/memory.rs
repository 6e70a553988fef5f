use super::{RateLimitRecord, RecordStore};

#[cfg(feature = "ahash")]
use ahash::AHashMap as HashMap;
#[cfg(not(feature = "ahash"))]
use std::collections::HashMap;

// Configuration constants
const DEFAULT_CAPACITY: usize = 1000;
const CAPACITY_OVERHEAD_FACTOR: f64 = 1.3;

/// In-memory record store
///
/// Keeps one [`RateLimitRecord`] per identity in a hash map. Records are
/// never pruned: expired windows are reset in place by the limiter, and
/// the identity set only grows. This mirrors the persisted layout the
/// gateway originally used and keeps the metrics scan trivial.
///
/// # Example
///
/// ```
/// use streamgate::MemoryStore;
///
/// let store = MemoryStore::builder()
///     .capacity(100_000)
///     .build();
/// ```
pub struct MemoryStore {
    data: HashMap<String, RateLimitRecord>,
}

/// Builder for configuring a MemoryStore
pub struct MemoryStoreBuilder {
    capacity: usize,
}

impl MemoryStore {
    /// Create a new MemoryStore with default capacity
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Create a new MemoryStore with specified capacity
    ///
    /// The store will allocate 30% more space to reduce hash collisions.
    pub fn with_capacity(capacity: usize) -> Self {
        MemoryStore {
            // Pre-allocate with overhead to avoid rehashing
            data: HashMap::with_capacity((capacity as f64 * CAPACITY_OVERHEAD_FACTOR) as usize),
        }
    }

    /// Create a new builder for configuring a MemoryStore
    pub fn builder() -> MemoryStoreBuilder {
        MemoryStoreBuilder {
            capacity: DEFAULT_CAPACITY,
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<RateLimitRecord>, String> {
        Ok(self.data.get(key).copied())
    }

    fn compare_and_swap(
        &mut self,
        key: &str,
        old: RateLimitRecord,
        new: RateLimitRecord,
    ) -> Result<bool, String> {
        match self.data.get_mut(key) {
            Some(current) if *current == old => {
                *current = new;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    fn set_if_not_exists(&mut self, key: &str, value: RateLimitRecord) -> Result<bool, String> {
        if self.data.contains_key(key) {
            return Ok(false);
        }
        self.data.insert(key.to_string(), value);
        Ok(true)
    }

    fn scan(&self, visit: &mut dyn FnMut(&str, &RateLimitRecord)) {
        for (key, record) in &self.data {
            visit(key, record);
        }
    }

    fn len(&self) -> usize {
        self.data.len()
    }
}

impl Default for MemoryStoreBuilder {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
        }
    }
}

impl MemoryStoreBuilder {
    /// Create a new builder with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the expected capacity (number of unique identities)
    ///
    /// The store will allocate 30% more space to reduce hash collisions.
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Build the MemoryStore with the configured settings
    pub fn build(self) -> MemoryStore {
        MemoryStore::with_capacity(self.capacity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_if_not_exists() {
        let mut store = MemoryStore::new();
        let rec = RateLimitRecord::fresh(1_000);

        assert!(store.set_if_not_exists("u1", rec).unwrap());
        assert!(!store.set_if_not_exists("u1", rec).unwrap());
        assert_eq!(store.get("u1").unwrap(), Some(rec));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_compare_and_swap_detects_stale_read() {
        let mut store = MemoryStore::new();
        let first = RateLimitRecord::fresh(1_000);
        store.set_if_not_exists("u1", first).unwrap();

        let mut second = first;
        second.requests = 2;

        // Swap from the current value succeeds
        assert!(store.compare_and_swap("u1", first, second).unwrap());
        // Swapping again from the stale value fails
        assert!(!store.compare_and_swap("u1", first, second).unwrap());
        assert_eq!(store.get("u1").unwrap().unwrap().requests, 2);
    }

    #[test]
    fn test_compare_and_swap_missing_key() {
        let mut store = MemoryStore::new();
        let rec = RateLimitRecord::fresh(1_000);
        assert!(!store.compare_and_swap("absent", rec, rec).unwrap());
    }

    #[test]
    fn test_scan_visits_all_records() {
        let mut store = MemoryStore::new();
        store
            .set_if_not_exists("u1", RateLimitRecord::fresh(1_000))
            .unwrap();
        store
            .set_if_not_exists("u2", RateLimitRecord::fresh(2_000))
            .unwrap();

        let mut seen = Vec::new();
        store.scan(&mut |key, _| seen.push(key.to_string()));
        seen.sort();
        assert_eq!(seen, vec!["u1", "u2"]);
    }
}
