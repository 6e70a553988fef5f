//! # Streamgate Server
//!
//! A rate-limited gateway in front of an external video metadata provider.
//!
//! ## Purpose
//!
//! The server exposes four RPC-style operations over HTTP/JSON:
//!
//! - **getStreamUrl**: resolve a video id to a playable audio stream URL,
//!   picking the highest-bitrate audio format the provider offers
//! - **karaokeSearch**: free-text search, normalized into a stable result
//!   shape with the provider's relevance order preserved
//! - **healthCheck**: probe the provider with a known-stable video id and
//!   report `healthy` or `degraded` (never fails the caller)
//! - **getMetrics**: aggregated rate-limit statistics (total / banned /
//!   active identities), for administrative use
//!
//! Every stream/search call is admitted through a per-identity fixed-window
//! rate limiter (20 requests per minute, 10 minute ban) before the provider
//! is invoked. Validation and rate-limit failures are reported without any
//! external call being made.
//!
//! ## Quick Start
//!
//! ```bash
//! # Start on the default port
//! streamgate
//!
//! # Custom port and limits
//! streamgate --port 9090 --max-requests 50 --window-secs 60
//!
//! # List all environment variables
//! streamgate --list-env-vars
//! ```
//!
//! Callers identify themselves with the `x-identity` header:
//!
//! ```bash
//! curl -X POST http://localhost:8080/v1/stream \
//!   -H "Content-Type: application/json" \
//!   -H "x-identity: user:123" \
//!   -d '{"videoId": "dQw4w9WgXcQ"}'
//! ```
//!
//! ## Architecture
//!
//! The server keeps the rate limiter behind an actor and shares a single
//! stateless provider client across all concurrent calls:
//!
//! ```text
//! ┌─────────────┐
//! │    HTTP     │
//! │  Transport  │
//! └──────┬──────┘
//!        │
//! ┌──────▼──────────┐     ┌───────────────┐
//! │   Extraction    ├────►│   Provider    │
//! │    Gateway      │     │  (Innertube)  │
//! └──────┬──────────┘     └───────────────┘
//!        │
//! ┌──────▼──────┐
//! │   Limiter   │
//! │    Actor    │
//! └─────────────┘
//! ```
//!
//! Provider failures are classified inside the provider adapter into a
//! closed set of error kinds; the gateway maps those (plus its own
//! validation and rate-limit failures) to short localized user messages
//! and stable machine codes. Internal details never reach the caller.

pub mod config;
pub mod error;
pub mod gateway;
pub mod limiter;
pub mod metrics;
pub mod provider;
pub mod transport;
pub mod types;
