use super::{FixedWindowLimiter, MemoryStore, RateLimitConfig, RateLimitError};
use std::time::{Duration, SystemTime};

fn limiter() -> FixedWindowLimiter<MemoryStore> {
    FixedWindowLimiter::new(MemoryStore::new(), RateLimitConfig::default())
}

#[test]
fn test_first_request_admitted() {
    let mut limiter = limiter();

    let now = SystemTime::now();
    let decision = limiter.check("u1", now).unwrap();
    assert_eq!(decision.remaining, 19);
}

#[test]
fn test_threshold_bans_within_window() {
    let mut limiter = limiter();
    let now = SystemTime::now();

    // Exactly the threshold count is admitted
    for i in 0..20 {
        let decision = limiter.check("u1", now).unwrap();
        assert_eq!(decision.remaining, 19 - i, "request {} should be admitted", i + 1);
    }

    // The 21st request in the same window is denied and bans the identity
    assert_eq!(limiter.check("u1", now), Err(RateLimitError::QuotaExceeded));

    // Subsequent checks report the active ban
    match limiter.check("u1", now) {
        Err(RateLimitError::TemporarilyBanned { retry_after }) => {
            assert!(retry_after <= Duration::from_secs(600));
        }
        other => panic!("expected TemporarilyBanned, got {other:?}"),
    }
}

#[test]
fn test_ban_holds_until_cooldown_end() {
    let mut limiter = limiter();
    let start = SystemTime::now();

    for _ in 0..20 {
        limiter.check("u1", start).unwrap();
    }
    assert_eq!(limiter.check("u1", start), Err(RateLimitError::QuotaExceeded));

    // 1ms before the cooldown ends the identity is still banned
    let almost = start + Duration::from_millis(600_000 - 1);
    assert!(matches!(
        limiter.check("u1", almost),
        Err(RateLimitError::TemporarilyBanned { .. })
    ));
}

#[test]
fn test_expired_ban_without_rollover_rebans() {
    // The ban only clears at window rollover. The cooldown expiring is not
    // enough: the counter left at the threshold re-bans immediately. Needs
    // ban < window to be observable, so use a short-ban configuration.
    let start = SystemTime::now();
    let config = RateLimitConfig {
        max_requests_per_window: 3,
        window_duration: Duration::from_secs(60),
        ban_duration: Duration::from_secs(5),
    };
    let mut limiter = FixedWindowLimiter::new(MemoryStore::new(), config);

    for _ in 0..3 {
        limiter.check("u2", start).unwrap();
    }
    assert_eq!(limiter.check("u2", start), Err(RateLimitError::QuotaExceeded));

    // Ban cooldown over, window still open: immediately re-banned
    let after_ban = start + Duration::from_secs(6);
    assert_eq!(
        limiter.check("u2", after_ban),
        Err(RateLimitError::QuotaExceeded)
    );
}

#[test]
fn test_rollover_after_ban_resets_counter() {
    let mut limiter = limiter();
    let start = SystemTime::now();

    for _ in 0..20 {
        limiter.check("u1", start).unwrap();
    }
    assert_eq!(limiter.check("u1", start), Err(RateLimitError::QuotaExceeded));

    // Far enough that the cooldown elapsed and the window rolled over
    let later = start + Duration::from_millis(600_000 + 60_000 + 1);
    let decision = limiter.check("u1", later).unwrap();
    assert_eq!(decision.remaining, 19);
}

#[test]
fn test_window_rollover_resets_count() {
    let mut limiter = limiter();
    let start = SystemTime::now();

    for _ in 0..5 {
        limiter.check("u1", start).unwrap();
    }

    let next_window = start + Duration::from_millis(60_001);
    let decision = limiter.check("u1", next_window).unwrap();
    assert_eq!(decision.remaining, 19);
}

#[test]
fn test_identities_are_independent() {
    let mut limiter = limiter();
    let now = SystemTime::now();

    for _ in 0..20 {
        limiter.check("u1", now).unwrap();
    }
    assert!(limiter.check("u1", now).is_err());

    // u2 is unaffected by u1's ban
    assert!(limiter.check("u2", now).is_ok());
}

#[test]
fn test_stats_counts() {
    let mut limiter = limiter();
    let now = SystemTime::now();

    limiter.check("active", now).unwrap();
    for _ in 0..20 {
        limiter.check("banned", now).unwrap();
    }
    let _ = limiter.check("banned", now);

    let stats = limiter.stats(now).unwrap();
    assert_eq!(stats.total_identities, 2);
    assert_eq!(stats.banned_identities, 1);
    assert_eq!(stats.active_identities, 2);
}

#[test]
fn test_stats_idempotent_without_checks() {
    let mut limiter = limiter();
    let now = SystemTime::now();

    for _ in 0..3 {
        limiter.check("u1", now).unwrap();
    }

    let first = limiter.stats(now).unwrap();
    let second = limiter.stats(now).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_denied_check_does_not_consume_quota() {
    let mut limiter = limiter();
    let start = SystemTime::now();

    for _ in 0..20 {
        limiter.check("u1", start).unwrap();
    }
    // Several denied checks in a row, then a rollover: the reset is clean
    let _ = limiter.check("u1", start);
    let _ = limiter.check("u1", start);

    let later = start + Duration::from_millis(600_000 + 60_000 + 1);
    let decision = limiter.check("u1", later).unwrap();
    assert_eq!(decision.remaining, 19);
}
