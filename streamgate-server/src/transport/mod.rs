//! Transport layer for the extraction gateway
//!
//! The gateway itself is transport-agnostic; this module exposes it over
//! the network. All transports implement the [`Transport`] trait and share
//! the same gateway (and therefore the same rate limiter actor).
//!
//! # Available Transports
//!
//! - [`http`]: REST API with JSON payloads

pub mod http;

#[cfg(test)]
mod http_test;

use crate::gateway::ExtractionGateway;
use crate::metrics::Metrics;
use crate::provider::MediaProvider;
use crate::types::SystemInfo;
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Everything a transport needs to serve requests
pub struct ServerContext<P> {
    pub gateway: ExtractionGateway<P>,
    pub metrics: Arc<Metrics>,
    /// Effective rate-limit parameters, reported by the metrics endpoint
    pub limits: SystemInfo,
}

/// Common interface for all transport implementations
///
/// A transport binds to its configured address, parses protocol-specific
/// requests, and forwards them to the gateway. The start method runs until
/// an error occurs or the server shuts down.
#[async_trait]
pub trait Transport {
    async fn start<P: MediaProvider + 'static>(self, ctx: ServerContext<P>) -> Result<()>;
}
