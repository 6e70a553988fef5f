//! Core components of the streamgate rate limiting library
//!
//! This module contains the fundamental building blocks:
//! - [`limiter`]: The fixed-window limiter with ban cooldown
//! - [`store`]: Storage backends for rate limit records

pub mod limiter;
pub mod store;
#[cfg(test)]
mod tests;

pub use limiter::{FixedWindowLimiter, LimiterStats, RateLimitConfig, RateLimitDecision};
pub use store::{MemoryStore, MemoryStoreBuilder, RateLimitRecord, RecordStore};

use std::error::Error;
use std::fmt;
use std::time::Duration;

/// Errors that can occur during an admission check
///
/// # Variants
///
/// - [`QuotaExceeded`](RateLimitError::QuotaExceeded): The identity hit the
///   per-window threshold and has just been banned
/// - [`TemporarilyBanned`](RateLimitError::TemporarilyBanned): The identity
///   is still inside its ban cooldown
/// - [`Internal`](RateLimitError::Internal): An internal error occurred
///   (e.g., store failure or time calculation error)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RateLimitError {
    /// The per-window request threshold was reached in the current window
    QuotaExceeded,
    /// The identity is banned and the cooldown has not yet elapsed
    TemporarilyBanned {
        /// Time remaining until the ban cooldown expires
        retry_after: Duration,
    },
    /// An internal error occurred
    Internal(String),
}

impl fmt::Display for RateLimitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RateLimitError::QuotaExceeded => write!(f, "request quota exceeded"),
            RateLimitError::TemporarilyBanned { retry_after } => {
                write!(f, "temporarily banned, retry after {}s", retry_after.as_secs())
            }
            RateLimitError::Internal(msg) => write!(f, "internal error: {msg}"),
        }
    }
}

impl Error for RateLimitError {}
