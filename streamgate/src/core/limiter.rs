//! Fixed-window limiter with ban cooldown
//!
//! This module provides the main [`FixedWindowLimiter`] struct which
//! implements a per-identity fixed-window counter: identities that hit the
//! threshold inside a window are banned for a cooldown period.

use super::RateLimitError;
use super::store::{RateLimitRecord, RecordStore, to_epoch_ms};
use std::time::{Duration, SystemTime};

/// Configuration for a [`FixedWindowLimiter`]
///
/// The defaults match the original gateway deployment: 20 requests per
/// one-minute window with a ten-minute ban.
#[derive(Debug, Clone, Copy)]
pub struct RateLimitConfig {
    /// Maximum requests admitted in one window
    pub max_requests_per_window: u32,
    /// Length of the fixed window
    pub window_duration: Duration,
    /// Ban cooldown applied when the threshold is reached
    pub ban_duration: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        RateLimitConfig {
            max_requests_per_window: 20,
            window_duration: Duration::from_secs(60),
            ban_duration: Duration::from_secs(600),
        }
    }
}

/// Result of a successful admission check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitDecision {
    /// Requests still admissible in the current window after this one
    pub remaining: u32,
}

/// Aggregated statistics over all tracked identities
///
/// Produced by scanning every record; O(n) in identity count and meant
/// for the administrative metrics operation, not the hot path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LimiterStats {
    /// Identities with a record in the store
    pub total_identities: usize,
    /// Identities whose ban cooldown has not yet elapsed
    pub banned_identities: usize,
    /// Identities whose current window is still open
    pub active_identities: usize,
}

/// Fixed-window rate limiter with ban cooldown
///
/// Requires a [`RecordStore`] implementation to hold per-identity records.
///
/// # Example
///
/// ```
/// use streamgate::{FixedWindowLimiter, MemoryStore, RateLimitConfig};
/// use std::time::SystemTime;
///
/// let mut limiter = FixedWindowLimiter::new(MemoryStore::new(), RateLimitConfig::default());
/// assert!(limiter.check("user:123", SystemTime::now()).is_ok());
/// ```
pub struct FixedWindowLimiter<S: RecordStore> {
    store: S,
    config: RateLimitConfig,
}

impl<S: RecordStore> FixedWindowLimiter<S> {
    /// Create a new limiter with the specified store and configuration
    pub fn new(store: S, config: RateLimitConfig) -> Self {
        FixedWindowLimiter { store, config }
    }

    /// The configuration this limiter was built with
    pub fn config(&self) -> &RateLimitConfig {
        &self.config
    }

    /// Check whether `identity` may proceed at time `now`
    ///
    /// On admission the identity's counter is incremented (or reset to 1 if
    /// the window rolled over). On a threshold hit the identity is banned
    /// and the check fails with [`RateLimitError::QuotaExceeded`]; while the
    /// ban cooldown runs, checks fail with
    /// [`RateLimitError::TemporarilyBanned`] without mutating the record.
    ///
    /// An expired ban is only cleared by a window rollover: until the window
    /// expires the counter is still at the threshold, so the identity is
    /// re-banned immediately.
    ///
    /// # Errors
    ///
    /// - [`RateLimitError::QuotaExceeded`]: threshold reached in this window
    /// - [`RateLimitError::TemporarilyBanned`]: ban cooldown still running
    /// - [`RateLimitError::Internal`]: store or time failure
    pub fn check(
        &mut self,
        identity: &str,
        now: SystemTime,
    ) -> Result<RateLimitDecision, RateLimitError> {
        let now_ms = to_epoch_ms(now).map_err(RateLimitError::Internal)?;
        let window_ms = self.config.window_duration.as_millis() as i64;
        let ban_ms = self.config.ban_duration.as_millis() as i64;
        let max = self.config.max_requests_per_window;

        // Retry loop with limit: a failed CAS means another check raced us,
        // so re-read and re-evaluate against the fresh record.
        const MAX_RETRIES: u32 = 10;
        let mut retries = 0;

        loop {
            let record = self.store.get(identity).map_err(RateLimitError::Internal)?;

            let outcome = match record {
                Some(rec) => {
                    if let Some(banned_at) = rec.banned_at.filter(|_| rec.banned) {
                        let since_ban = now_ms.saturating_sub(banned_at);
                        if since_ban < ban_ms {
                            return Err(RateLimitError::TemporarilyBanned {
                                retry_after: Duration::from_millis(
                                    (ban_ms - since_ban).max(0) as u64
                                ),
                            });
                        }
                    }

                    if now_ms.saturating_sub(rec.window_start) > window_ms {
                        // New window: reset the record, ban included
                        let fresh = RateLimitRecord::fresh(now_ms);
                        let swapped = self
                            .store
                            .compare_and_swap(identity, rec, fresh)
                            .map_err(RateLimitError::Internal)?;
                        swapped.then(|| Ok(RateLimitDecision {
                            remaining: max.saturating_sub(1),
                        }))
                    } else if rec.requests >= max {
                        // Threshold reached inside an active window: ban,
                        // leaving the counter untouched
                        let banned = RateLimitRecord {
                            banned: true,
                            banned_at: Some(now_ms),
                            ..rec
                        };
                        let swapped = self
                            .store
                            .compare_and_swap(identity, rec, banned)
                            .map_err(RateLimitError::Internal)?;
                        swapped.then(|| Err(RateLimitError::QuotaExceeded))
                    } else {
                        let bumped = RateLimitRecord {
                            requests: rec.requests + 1,
                            ..rec
                        };
                        let swapped = self
                            .store
                            .compare_and_swap(identity, rec, bumped)
                            .map_err(RateLimitError::Internal)?;
                        swapped.then(|| Ok(RateLimitDecision {
                            remaining: max.saturating_sub(bumped.requests),
                        }))
                    }
                }
                None => {
                    // First request from this identity
                    let fresh = RateLimitRecord::fresh(now_ms);
                    let inserted = self
                        .store
                        .set_if_not_exists(identity, fresh)
                        .map_err(RateLimitError::Internal)?;
                    inserted.then(|| Ok(RateLimitDecision {
                        remaining: max.saturating_sub(1),
                    }))
                }
            };

            match outcome {
                Some(result) => return result,
                None => {
                    // Lost the race - retry with limit
                    retries += 1;
                    if retries >= MAX_RETRIES {
                        return Err(RateLimitError::Internal("max retries exceeded".into()));
                    }
                }
            }
        }
    }

    /// Aggregate statistics over every tracked identity at time `now`
    pub fn stats(&self, now: SystemTime) -> Result<LimiterStats, RateLimitError> {
        let now_ms = to_epoch_ms(now).map_err(RateLimitError::Internal)?;
        let window_ms = self.config.window_duration.as_millis() as i64;
        let ban_ms = self.config.ban_duration.as_millis() as i64;

        let mut stats = LimiterStats {
            total_identities: 0,
            banned_identities: 0,
            active_identities: 0,
        };

        self.store.scan(&mut |_, rec| {
            stats.total_identities += 1;
            if let Some(banned_at) = rec.banned_at.filter(|_| rec.banned) {
                if now_ms.saturating_sub(banned_at) < ban_ms {
                    stats.banned_identities += 1;
                }
            }
            if now_ms.saturating_sub(rec.window_start) < window_ms {
                stats.active_identities += 1;
            }
        });

        Ok(stats)
    }
}
