//! Rate limiter actor
//!
//! The fixed-window limiter is single-owner state; the server runs it
//! inside an actor and hands out a cloneable [`LimiterHandle`]. Admission
//! checks and the metrics scan both go through the same channel, so stats
//! always observe a consistent store.

use std::time::SystemTime;
use streamgate::{
    FixedWindowLimiter, LimiterStats, MemoryStore, RateLimitConfig, RateLimitDecision,
    RateLimitError,
};
use tokio::sync::{mpsc, oneshot};

/// Message types for the limiter actor
pub enum LimiterMessage {
    Check {
        identity: String,
        timestamp: SystemTime,
        response_tx: oneshot::Sender<Result<RateLimitDecision, RateLimitError>>,
    },
    Stats {
        timestamp: SystemTime,
        response_tx: oneshot::Sender<Result<LimiterStats, RateLimitError>>,
    },
}

/// Handle to communicate with the limiter actor
#[derive(Clone)]
pub struct LimiterHandle {
    tx: mpsc::Sender<LimiterMessage>,
}

impl LimiterHandle {
    /// Check whether `identity` may proceed right now
    pub async fn check(&self, identity: String) -> Result<RateLimitDecision, RateLimitError> {
        let (response_tx, response_rx) = oneshot::channel();

        self.tx
            .send(LimiterMessage::Check {
                identity,
                timestamp: SystemTime::now(),
                response_tx,
            })
            .await
            .map_err(|_| RateLimitError::Internal("limiter actor has shut down".into()))?;

        response_rx
            .await
            .map_err(|_| RateLimitError::Internal("limiter actor dropped response channel".into()))?
    }

    /// Aggregate rate-limit statistics across all identities
    pub async fn stats(&self) -> Result<LimiterStats, RateLimitError> {
        let (response_tx, response_rx) = oneshot::channel();

        self.tx
            .send(LimiterMessage::Stats {
                timestamp: SystemTime::now(),
                response_tx,
            })
            .await
            .map_err(|_| RateLimitError::Internal("limiter actor has shut down".into()))?;

        response_rx
            .await
            .map_err(|_| RateLimitError::Internal("limiter actor dropped response channel".into()))?
    }
}

/// The limiter actor
pub struct LimiterActor;

impl LimiterActor {
    /// Spawn a limiter actor owning a memory store
    pub fn spawn(buffer_size: usize, store: MemoryStore, config: RateLimitConfig) -> LimiterHandle {
        let (tx, rx) = mpsc::channel(buffer_size);

        tokio::spawn(async move {
            let limiter = FixedWindowLimiter::new(store, config);
            run_actor(rx, limiter).await;
        });

        LimiterHandle { tx }
    }
}

async fn run_actor(
    mut rx: mpsc::Receiver<LimiterMessage>,
    mut limiter: FixedWindowLimiter<MemoryStore>,
) {
    while let Some(msg) = rx.recv().await {
        match msg {
            LimiterMessage::Check {
                identity,
                timestamp,
                response_tx,
            } => {
                let response = limiter.check(&identity, timestamp);
                // Ignore send errors - receiver may have timed out
                let _ = response_tx.send(response);
            }
            LimiterMessage::Stats {
                timestamp,
                response_tx,
            } => {
                let _ = response_tx.send(limiter.stats(timestamp));
            }
        }
    }

    tracing::info!("limiter actor shutting down");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn spawn_limiter(max: u32) -> LimiterHandle {
        let config = RateLimitConfig {
            max_requests_per_window: max,
            window_duration: Duration::from_secs(60),
            ban_duration: Duration::from_secs(600),
        };
        LimiterActor::spawn(64, MemoryStore::new(), config)
    }

    #[tokio::test]
    async fn test_check_through_actor() {
        let handle = spawn_limiter(2);

        assert!(handle.check("u1".into()).await.is_ok());
        assert!(handle.check("u1".into()).await.is_ok());
        assert_eq!(
            handle.check("u1".into()).await,
            Err(RateLimitError::QuotaExceeded)
        );
    }

    #[tokio::test]
    async fn test_stats_through_actor() {
        let handle = spawn_limiter(5);

        handle.check("u1".into()).await.unwrap();
        handle.check("u2".into()).await.unwrap();

        let stats = handle.stats().await.unwrap();
        assert_eq!(stats.total_identities, 2);
        assert_eq!(stats.banned_identities, 0);
        assert_eq!(stats.active_identities, 2);

        // Idempotent when no checks happen in between
        let again = handle.stats().await.unwrap();
        assert_eq!(stats, again);
    }
}
