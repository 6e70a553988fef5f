//! Wire types shared between the gateway and the HTTP transport
//!
//! All payloads are JSON with camelCase field names, matching the shapes
//! the original callable endpoints exposed.

use serde::{Deserialize, Serialize};

/// Request body for `POST /v1/stream`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamRequest {
    /// 11-character video id; validated before any provider call
    #[serde(default)]
    pub video_id: String,
}

/// Response body for a successful stream resolution
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamResponse {
    pub success: bool,
    pub stream_url: String,
    pub video_info: VideoInfo,
    pub format: FormatInfo,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoInfo {
    pub title: String,
    pub duration: u64,
    pub author: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormatInfo {
    pub quality: String,
    pub audio_bitrate: u64,
}

/// Request body for `POST /v1/search`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    #[serde(default)]
    pub query: String,
    /// Result cap; defaults to 10
    pub max_results: Option<usize>,
}

/// Response body for a successful search
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub success: bool,
    pub items: Vec<SearchItem>,
    pub search_info: SearchInfo,
}

/// One normalized search result, in the provider's relevance order
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchItem {
    pub video_id: String,
    pub title: String,
    pub description: String,
    pub channel_title: String,
    pub thumbnail_url: String,
    pub published_ago: String,
    pub duration_label: String,
    pub view_count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchInfo {
    /// Total results the provider returned before truncation
    pub total_results: usize,
    pub search_type: String,
    pub query: String,
    pub processing_time_ms: u64,
}

/// Response body for `GET /v1/health` - never an error
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    /// "healthy" or "degraded"
    pub status: String,
    pub timestamp: String,
    pub message: String,
    pub services: ServiceStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceStatus {
    pub gateway: String,
    pub provider: String,
}

/// Response body for `GET /v1/metrics` (administrative)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsResponse {
    pub timestamp: String,
    pub rate_limiting: RateLimitingStats,
    pub system: SystemInfo,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateLimitingStats {
    pub total_identities: usize,
    pub banned_identities: usize,
    pub active_identities: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemInfo {
    pub requests_per_window: u32,
    pub window_seconds: u64,
    pub ban_seconds: u64,
}

/// Error body returned for every failed operation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub success: bool,
    /// Stable machine code, e.g. "rate_limited"
    pub code: String,
    /// Short localized message; no internal detail
    pub error: String,
}
