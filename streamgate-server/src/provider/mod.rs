//! External video metadata/search provider abstraction
//!
//! The gateway treats the provider as a black box behind [`MediaProvider`].
//! Each adapter is responsible for translating its provider's failure
//! signals into the closed [`ProviderErrorKind`] set, so swapping providers
//! only touches the adapter, never the gateway logic.

pub mod innertube;

use async_trait::async_trait;
use thiserror::Error;

/// Raw video metadata returned by a provider lookup
///
/// Field values are already reconciled across the provider's inconsistent
/// response shapes (the adapter tries multiple field-name fallbacks).
#[derive(Debug, Clone)]
pub struct VideoMetadata {
    pub title: String,
    pub author: String,
    pub duration_seconds: u64,
    pub formats: Vec<RawFormat>,
}

/// One media stream variant from the provider's format list
#[derive(Debug, Clone, Default)]
pub struct RawFormat {
    /// MIME type, e.g. `audio/webm; codecs="opus"`
    pub mime_type: String,
    /// Bitrate in bits per second (0 if the provider omitted it)
    pub bitrate: u64,
    /// Human-readable quality label, if any
    pub quality: Option<String>,
    /// Direct playable URL, if present
    pub url: Option<String>,
    /// Signature cipher blob (query-string encoded) when no direct URL
    pub cipher: Option<String>,
}

/// One raw search result item, in the provider's relevance order
#[derive(Debug, Clone)]
pub struct RawSearchItem {
    pub video_id: String,
    pub title: String,
    pub description: String,
    pub channel_title: String,
    pub thumbnail_url: String,
    /// Relative publication time, e.g. "3 years ago"
    pub published_ago: String,
    /// Duration label, e.g. "3:33"
    pub duration_label: String,
    pub view_count: u64,
}

/// Closed set of provider failure kinds
///
/// Adapters translate provider-specific signals (status codes, playability
/// reasons, transport errors) into these kinds; the gateway dispatches on
/// them and never inspects raw provider messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderErrorKind {
    /// Video deleted, region-blocked, or otherwise unavailable
    VideoUnavailable,
    /// Private video
    PrivateVideo,
    /// Age-restricted content requiring sign-in
    AgeRestricted,
    /// Live streams are not supported
    LiveUnsupported,
    /// The response carried no streaming data
    NoStreamingData,
    /// The provider call timed out
    Timeout,
    /// Network-level failure reaching the provider
    Network,
    /// Anything the adapter could not classify
    Other,
}

/// A provider failure: a classified kind plus the raw provider message
///
/// The raw message is kept for diagnostics (logs) only and is never
/// surfaced to callers.
#[derive(Debug, Clone, Error)]
#[error("{kind:?}: {message}")]
pub struct ProviderError {
    pub kind: ProviderErrorKind,
    pub message: String,
}

impl ProviderError {
    pub fn new(kind: ProviderErrorKind, message: impl Into<String>) -> Self {
        ProviderError {
            kind,
            message: message.into(),
        }
    }
}

/// Common interface for video metadata/search providers
///
/// Implementations must be stateless after construction (safe to share
/// across concurrent calls without locking); the server builds one handle
/// at startup and shares it process-wide.
#[async_trait]
pub trait MediaProvider: Send + Sync {
    /// Fetch metadata and the format list for a video id
    async fn video_info(&self, video_id: &str) -> Result<VideoMetadata, ProviderError>;

    /// Free-text search, results in the provider's relevance order
    async fn search(&self, query: &str) -> Result<Vec<RawSearchItem>, ProviderError>;
}
