//! # streamgate
//!
//! Fixed-window rate limiting with a ban cooldown, as used by the
//! streamgate extraction gateway for per-identity admission control.
//!
//! ## Overview
//!
//! Each identity gets a counter that resets at fixed window boundaries:
//! - **Fixed windows**: the counter resets entirely when the window rolls over
//! - **Ban cooldown**: an identity that hits the threshold inside a window is
//!   banned for a cooldown period before it can be admitted again
//! - **Atomic updates**: all record mutations go through compare-and-swap,
//!   so concurrent checks against the same identity never undercount
//!
//! ## Quick Start
//!
//! ```
//! use streamgate::{FixedWindowLimiter, MemoryStore, RateLimitConfig};
//! use std::time::SystemTime;
//!
//! // 20 requests per 60s window, 10 minute ban on abuse
//! let mut limiter = FixedWindowLimiter::new(MemoryStore::new(), RateLimitConfig::default());
//!
//! match limiter.check("user:123", SystemTime::now()) {
//!     Ok(decision) => println!("Admitted, {} left in window", decision.remaining),
//!     Err(e) => println!("Denied: {e}"),
//! }
//! ```
//!
//! ## Semantics
//!
//! For a check at time `now` against the stored record:
//!
//! 1. If the identity is banned and the cooldown has not elapsed, the check
//!    fails without touching the record.
//! 2. If the window has expired, the record is reset (count 1, new window,
//!    ban cleared) and the check succeeds.
//! 3. If the counter has reached the threshold, the identity is banned
//!    (`banned_at = now`, count unchanged) and the check fails.
//! 4. Otherwise the counter is incremented and the check succeeds.
//!
//! Note that an expired ban is only cleared by a window rollover (step 2):
//! until the window rolls over, the counter is still at the threshold and
//! step 3 re-bans the identity immediately. Callers relying on the cooldown
//! alone will keep being denied until the window also expires.
//!
//! ## Thread Safety
//!
//! The limiter itself is not thread-safe. For concurrent access, wrap it in
//! a mutex or own it from a single task (the streamgate server runs it
//! inside an actor).
//!
//! ## Features
//!
//! - `ahash` (default): Use AHash for faster hashing in [`MemoryStore`]

pub mod core;

pub use core::{
    FixedWindowLimiter, LimiterStats, MemoryStore, MemoryStoreBuilder, RateLimitConfig,
    RateLimitDecision, RateLimitError, RateLimitRecord, RecordStore,
};

// Re-export the store module so external store implementations can be built
// against the same trait path.
pub use crate::core::store;
