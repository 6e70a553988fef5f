//! Extraction gateway
//!
//! Validates requests, admits them through the rate limiter, invokes the
//! provider, and normalizes the outcome. Validation and rate-limit
//! failures are reported before any provider call is made.

use crate::error::{GatewayError, MAX_QUERY_LEN};
use crate::limiter::LimiterHandle;
use crate::provider::{MediaProvider, RawFormat, RawSearchItem};
use std::sync::Arc;
use std::time::Instant;
use streamgate::LimiterStats;
use url::form_urlencoded;

/// Default search result cap when the caller does not specify one
pub const DEFAULT_MAX_RESULTS: usize = 10;

// Known-stable video id used as the health probe target
const HEALTH_PROBE_VIDEO_ID: &str = "dQw4w9WgXcQ";

/// A resolved playable audio stream
#[derive(Debug, Clone)]
pub struct StreamResolution {
    pub stream_url: String,
    pub title: String,
    pub author: String,
    pub duration_seconds: u64,
    pub quality: String,
    pub audio_bitrate: u64,
}

/// A successful search: truncated items plus the pre-truncation count
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub items: Vec<RawSearchItem>,
    pub total_results: usize,
}

/// Outcome of the health probe; never an error
#[derive(Debug, Clone)]
pub struct HealthStatus {
    pub healthy: bool,
    pub message: String,
}

/// The extraction gateway
///
/// Cheap to clone; the provider handle is process-wide and stateless
/// after construction, the limiter is an actor handle.
pub struct ExtractionGateway<P> {
    limiter: LimiterHandle,
    provider: Arc<P>,
}

impl<P> Clone for ExtractionGateway<P> {
    fn clone(&self) -> Self {
        ExtractionGateway {
            limiter: self.limiter.clone(),
            provider: Arc::clone(&self.provider),
        }
    }
}

impl<P: MediaProvider> ExtractionGateway<P> {
    pub fn new(limiter: LimiterHandle, provider: Arc<P>) -> Self {
        ExtractionGateway { limiter, provider }
    }

    /// Resolve a video id to its best playable audio stream
    ///
    /// Validation order: identity, id presence, id format - all checked
    /// before the rate limiter runs, and the rate limiter runs before the
    /// provider is invoked.
    pub async fn resolve_stream(
        &self,
        identity: Option<&str>,
        video_id: &str,
    ) -> Result<StreamResolution, GatewayError> {
        let started = Instant::now();
        let identity = identity.ok_or(GatewayError::Unauthenticated)?;

        if video_id.is_empty() {
            tracing::warn!(identity, "missing videoId parameter");
            return Err(GatewayError::MissingParameter("videoId"));
        }
        if !is_valid_video_id(video_id) {
            tracing::warn!(identity, video_id, "invalid videoId format");
            return Err(GatewayError::InvalidVideoId);
        }

        self.limiter.check(identity.to_string()).await?;

        tracing::info!(identity, video_id, "stream resolution started");

        let info = self.provider.video_info(video_id).await.map_err(|e| {
            tracing::warn!(identity, video_id, provider_error = %e, "provider lookup failed");
            GatewayError::ProviderLookupFailed(e)
        })?;

        let (stream_url, best) = info
            .formats
            .iter()
            .filter(|f| f.mime_type.starts_with("audio/"))
            .filter_map(|f| playable_url(f).map(|url| (url, f)))
            .max_by_key(|(_, f)| f.bitrate)
            .ok_or_else(|| {
                tracing::warn!(identity, video_id, "no playable audio format");
                GatewayError::NoPlayableStream
            })?;

        tracing::info!(
            identity,
            video_id,
            bitrate = best.bitrate,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "stream url extracted"
        );

        Ok(StreamResolution {
            stream_url,
            title: info.title,
            author: info.author,
            duration_seconds: info.duration_seconds,
            quality: best.quality.clone().unwrap_or_default(),
            audio_bitrate: best.bitrate,
        })
    }

    /// Search the provider, preserving its relevance order
    pub async fn search(
        &self,
        identity: Option<&str>,
        query: &str,
        max_results: Option<usize>,
    ) -> Result<SearchOutcome, GatewayError> {
        let started = Instant::now();
        let identity = identity.ok_or(GatewayError::Unauthenticated)?;

        let query = query.trim();
        if query.is_empty() {
            tracing::warn!(identity, "missing search query");
            return Err(GatewayError::EmptyQuery);
        }
        let query_chars = query.chars().count();
        if query_chars > MAX_QUERY_LEN {
            tracing::warn!(identity, query = %truncate(query), "search query too long");
            return Err(GatewayError::QueryTooLong(query_chars));
        }

        self.limiter.check(identity.to_string()).await?;

        let max_results = max_results.unwrap_or(DEFAULT_MAX_RESULTS);
        tracing::info!(identity, query = %truncate(query), max_results, "search started");

        let mut items = self.provider.search(query).await.map_err(|e| {
            tracing::warn!(identity, query = %truncate(query), provider_error = %e, "provider search failed");
            GatewayError::ProviderLookupFailed(e)
        })?;

        if items.is_empty() {
            tracing::warn!(identity, query = %truncate(query), "no search results");
            return Err(GatewayError::NoSearchResults);
        }

        let total_results = items.len();
        items.truncate(max_results);

        tracing::info!(
            identity,
            query = %truncate(query),
            results = items.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "search completed"
        );

        Ok(SearchOutcome {
            items,
            total_results,
        })
    }

    /// Probe the provider with a fixed video id
    ///
    /// Never fails the caller: every internal error becomes a degraded
    /// status.
    pub async fn health_check(&self) -> HealthStatus {
        match self.provider.video_info(HEALTH_PROBE_VIDEO_ID).await {
            Ok(info) if !info.formats.is_empty() => HealthStatus {
                healthy: true,
                message: "게이트웨이가 정상적으로 동작 중입니다".to_string(),
            },
            Ok(_) => HealthStatus {
                healthy: false,
                message: "스트림 정보 추출에 문제가 있습니다".to_string(),
            },
            Err(e) => {
                tracing::warn!(provider_error = %e, "health probe failed");
                HealthStatus {
                    healthy: false,
                    message: "일부 서비스에 문제가 있습니다".to_string(),
                }
            }
        }
    }

    /// Aggregated rate-limit statistics; administrative, identity required
    pub async fn rate_limit_stats(
        &self,
        identity: Option<&str>,
    ) -> Result<LimiterStats, GatewayError> {
        let identity = identity.ok_or(GatewayError::Unauthenticated)?;
        tracing::info!(identity, "metrics requested");
        self.limiter
            .stats()
            .await
            .map_err(|e| GatewayError::Internal(e.to_string()))
    }
}

/// 11 characters from `[A-Za-z0-9_-]`
fn is_valid_video_id(id: &str) -> bool {
    id.len() == 11
        && id
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
}

/// Resolve a playable URL for a format: prefer a direct `url`, otherwise
/// reconstruct one from the signature cipher blob (`url` + `&sig=` +
/// whichever of `sig`/`s` is present)
fn playable_url(format: &RawFormat) -> Option<String> {
    if let Some(url) = &format.url {
        return Some(url.clone());
    }

    let cipher = format.cipher.as_deref()?;
    let mut base = None;
    let mut sig = None;
    let mut s = None;
    for (key, value) in form_urlencoded::parse(cipher.as_bytes()) {
        match key.as_ref() {
            "url" => base = Some(value.into_owned()),
            "sig" => sig = Some(value.into_owned()),
            "s" => s = Some(value.into_owned()),
            _ => {}
        }
    }

    let base = base?;
    Some(match sig.or(s) {
        Some(signature) => format!("{base}&sig={signature}"),
        None => base,
    })
}

// Log only a prefix of user queries
fn truncate(query: &str) -> String {
    query.chars().take(50).collect()
}
