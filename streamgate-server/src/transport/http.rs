//! HTTP/JSON transport
//!
//! REST API with JSON payloads. The caller's identity travels in the
//! `x-identity` header; requests without it are rejected with 401 before
//! anything else runs.
//!
//! # API Endpoints
//!
//! ## POST /v1/stream
//!
//! Resolve a video id to its best playable audio stream.
//!
//! ```json
//! { "videoId": "dQw4w9WgXcQ" }
//! ```
//!
//! ## POST /v1/search
//!
//! Search for karaoke videos. `maxResults` is optional (defaults to 10).
//!
//! ```json
//! { "query": "노래방 반주", "maxResults": 5 }
//! ```
//!
//! ## GET /v1/health
//!
//! Provider health probe. Always returns 200; a degraded provider shows
//! up in the body, never as an HTTP error.
//!
//! ## GET /v1/metrics
//!
//! Rate-limit store statistics (administrative, identity required).
//!
//! ## GET /metrics
//!
//! Server telemetry in Prometheus text format.

use super::{ServerContext, Transport};
use crate::error::GatewayError;
use crate::gateway::ExtractionGateway;
use crate::metrics::{Metrics, Operation, Outcome};
use crate::provider::MediaProvider;
use crate::types::{
    ErrorResponse, FormatInfo, HealthResponse, MetricsResponse, RateLimitingStats, SearchInfo,
    SearchItem, SearchRequest, SearchResponse, ServiceStatus, StreamRequest, StreamResponse,
    SystemInfo, VideoInfo,
};
use anyhow::Result;
use async_trait::async_trait;
use axum::{
    Router,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::Json,
    routing::{get, post},
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

/// HTTP transport implementation
pub struct HttpTransport {
    addr: SocketAddr,
}

impl HttpTransport {
    pub fn new(host: &str, port: u16) -> Result<Self> {
        let addr = format!("{host}:{port}")
            .parse()
            .map_err(|e| anyhow::anyhow!("invalid listen address {host}:{port}: {e}"))?;
        Ok(Self { addr })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn start<P: MediaProvider + 'static>(self, ctx: ServerContext<P>) -> Result<()> {
        let app_state = Arc::new(AppState {
            gateway: ctx.gateway,
            metrics: ctx.metrics,
            limits: ctx.limits,
        });

        let app = Router::new()
            .route("/v1/stream", post(handle_stream))
            .route("/v1/search", post(handle_search))
            .route("/v1/health", get(handle_health))
            .route("/v1/metrics", get(handle_metrics))
            .route("/metrics", get(handle_prometheus))
            .with_state(app_state);

        tracing::info!("HTTP server listening on {}", self.addr);

        let listener = tokio::net::TcpListener::bind(self.addr).await?;
        axum::serve(listener, app).await?;

        Ok(())
    }
}

struct AppState<P> {
    gateway: ExtractionGateway<P>,
    metrics: Arc<Metrics>,
    limits: SystemInfo,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

/// Map a gateway error to its HTTP status and wire body
fn error_response(err: &GatewayError) -> ApiError {
    let status = match err {
        GatewayError::Unauthenticated => StatusCode::UNAUTHORIZED,
        GatewayError::MissingParameter(_)
        | GatewayError::InvalidVideoId
        | GatewayError::EmptyQuery
        | GatewayError::QueryTooLong(_) => StatusCode::BAD_REQUEST,
        GatewayError::RateLimited(_) => StatusCode::TOO_MANY_REQUESTS,
        GatewayError::ProviderLookupFailed(_) => StatusCode::BAD_GATEWAY,
        GatewayError::NoPlayableStream | GatewayError::NoSearchResults => StatusCode::NOT_FOUND,
        GatewayError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    (
        status,
        Json(ErrorResponse {
            success: false,
            code: err.code().to_string(),
            error: err.user_message().to_string(),
        }),
    )
}

fn outcome_for(err: &GatewayError) -> Outcome {
    match err {
        GatewayError::Unauthenticated
        | GatewayError::MissingParameter(_)
        | GatewayError::InvalidVideoId
        | GatewayError::EmptyQuery
        | GatewayError::QueryTooLong(_)
        | GatewayError::RateLimited(_) => Outcome::Denied,
        _ => Outcome::Failed,
    }
}

/// Caller identity from the `x-identity` header, if present and valid
fn identity(headers: &HeaderMap) -> Option<&str> {
    headers
        .get("x-identity")
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
}

async fn handle_stream<P: MediaProvider>(
    State(state): State<Arc<AppState<P>>>,
    headers: HeaderMap,
    Json(req): Json<StreamRequest>,
) -> Result<Json<StreamResponse>, ApiError> {
    let started = Instant::now();

    let result = state
        .gateway
        .resolve_stream(identity(&headers), &req.video_id)
        .await;

    record(&state.metrics, Operation::Stream, started, &result);

    let resolution = result.map_err(|e| error_response(&e))?;

    Ok(Json(StreamResponse {
        success: true,
        stream_url: resolution.stream_url,
        video_info: VideoInfo {
            title: resolution.title,
            duration: resolution.duration_seconds,
            author: resolution.author,
        },
        format: FormatInfo {
            quality: resolution.quality,
            audio_bitrate: resolution.audio_bitrate,
        },
    }))
}

async fn handle_search<P: MediaProvider>(
    State(state): State<Arc<AppState<P>>>,
    headers: HeaderMap,
    Json(req): Json<SearchRequest>,
) -> Result<Json<SearchResponse>, ApiError> {
    let started = Instant::now();

    let result = state
        .gateway
        .search(identity(&headers), &req.query, req.max_results)
        .await;

    record(&state.metrics, Operation::Search, started, &result);

    let outcome = result.map_err(|e| error_response(&e))?;

    let items = outcome
        .items
        .into_iter()
        .map(|item| SearchItem {
            video_id: item.video_id,
            title: item.title,
            description: item.description,
            channel_title: item.channel_title,
            thumbnail_url: item.thumbnail_url,
            published_ago: item.published_ago,
            duration_label: item.duration_label,
            view_count: item.view_count,
        })
        .collect();

    Ok(Json(SearchResponse {
        success: true,
        items,
        search_info: SearchInfo {
            total_results: outcome.total_results,
            search_type: "video".to_string(),
            query: req.query.trim().to_string(),
            processing_time_ms: started.elapsed().as_millis() as u64,
        },
    }))
}

async fn handle_health<P: MediaProvider>(
    State(state): State<Arc<AppState<P>>>,
) -> Json<HealthResponse> {
    let started = Instant::now();

    let status = state.gateway.health_check().await;

    state.metrics.record_request(
        Operation::Health,
        started.elapsed().as_micros() as u64,
        Outcome::Succeeded,
    );

    let label = if status.healthy { "healthy" } else { "degraded" };
    Json(HealthResponse {
        status: label.to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        message: status.message,
        services: ServiceStatus {
            gateway: "ok".to_string(),
            provider: if status.healthy { "ok" } else { "degraded" }.to_string(),
        },
    })
}

async fn handle_metrics<P: MediaProvider>(
    State(state): State<Arc<AppState<P>>>,
    headers: HeaderMap,
) -> Result<Json<MetricsResponse>, ApiError> {
    let started = Instant::now();

    let result = state.gateway.rate_limit_stats(identity(&headers)).await;

    record(&state.metrics, Operation::Metrics, started, &result);

    let stats = result.map_err(|e| error_response(&e))?;

    Ok(Json(MetricsResponse {
        timestamp: chrono::Utc::now().to_rfc3339(),
        rate_limiting: RateLimitingStats {
            total_identities: stats.total_identities,
            banned_identities: stats.banned_identities,
            active_identities: stats.active_identities,
        },
        system: state.limits.clone(),
    }))
}

async fn handle_prometheus<P: MediaProvider>(State(state): State<Arc<AppState<P>>>) -> String {
    state.metrics.export_prometheus()
}

fn record<T>(
    metrics: &Metrics,
    operation: Operation,
    started: Instant,
    result: &Result<T, GatewayError>,
) {
    let outcome = match result {
        Ok(_) => Outcome::Succeeded,
        Err(e) => outcome_for(e),
    };
    metrics.record_request(operation, started.elapsed().as_micros() as u64, outcome);
}
