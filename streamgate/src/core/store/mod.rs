use std::time::{SystemTime, UNIX_EPOCH};

mod memory;

pub use memory::{MemoryStore, MemoryStoreBuilder};

/// One rate limit record per identity
///
/// Records are created on the first request from an identity and then
/// read-modified-written on every subsequent check. They are never deleted:
/// an identity whose window has expired is simply reset in place at the
/// next check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitRecord {
    /// Requests seen in the current window
    pub requests: u32,
    /// Start of the current fixed window, in milliseconds since the epoch
    pub window_start: i64,
    /// Whether the identity is banned
    pub banned: bool,
    /// When the ban was applied, in milliseconds since the epoch
    ///
    /// Present only while `banned` is set. A banned record without a
    /// timestamp is treated as not banned.
    pub banned_at: Option<i64>,
}

impl RateLimitRecord {
    /// A fresh record representing the first request of a new window
    pub fn fresh(now_ms: i64) -> Self {
        RateLimitRecord {
            requests: 1,
            window_start: now_ms,
            banned: false,
            banned_at: None,
        }
    }
}

/// Store trait for rate limit record storage
///
/// Mutations go through compare-and-swap so that two concurrent checks
/// against the same identity cannot both observe the same pre-increment
/// count. Implementations backed by a remote document store should map
/// these to conditional writes.
pub trait RecordStore {
    /// Get the record for an identity
    fn get(&self, key: &str) -> Result<Option<RateLimitRecord>, String>;

    /// Replace `old` with `new`, failing if the stored record has changed
    fn compare_and_swap(
        &mut self,
        key: &str,
        old: RateLimitRecord,
        new: RateLimitRecord,
    ) -> Result<bool, String>;

    /// Insert a record only if the identity has none yet
    fn set_if_not_exists(&mut self, key: &str, value: RateLimitRecord) -> Result<bool, String>;

    /// Visit every record in the store
    ///
    /// Used by the metrics operation; O(n) in identity count and out of
    /// the admission hot path.
    fn scan(&self, visit: &mut dyn FnMut(&str, &RateLimitRecord));

    /// Number of identities tracked
    fn len(&self) -> usize;

    /// Whether the store tracks no identities
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Convert a wall-clock time to milliseconds since the epoch
pub(crate) fn to_epoch_ms(now: SystemTime) -> Result<i64, String> {
    now.duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .map_err(|e| format!("system time before epoch: {e}"))
}
