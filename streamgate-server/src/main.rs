use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;

use streamgate::MemoryStore;
use streamgate_server::config::Config;
use streamgate_server::gateway::ExtractionGateway;
use streamgate_server::limiter::LimiterActor;
use streamgate_server::metrics::Metrics;
use streamgate_server::provider::innertube::InnertubeProvider;
use streamgate_server::transport::{ServerContext, Transport, http::HttpTransport};
use streamgate_server::types::SystemInfo;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse configuration from environment variables and CLI arguments
    let config = Config::from_env_and_args()?;

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(format!("streamgate={}", config.log_level).parse()?),
        )
        .init();

    // Rate limiter actor owning the shared store
    let store = MemoryStore::builder()
        .capacity(config.store_capacity)
        .build();
    let limiter = LimiterActor::spawn(
        config.buffer_size,
        store,
        config.limits.rate_limit_config(),
    );

    // Upstream provider; a single client shared across all requests
    let provider = InnertubeProvider::with_config(
        &config.provider.base_url,
        Duration::from_secs(config.provider.timeout_secs),
    )
    .map_err(|e| anyhow::anyhow!("failed to build provider client: {e}"))?;

    let gateway = ExtractionGateway::new(limiter, Arc::new(provider));

    tracing::info!(
        "streamgate started: {} requests / {}s window, {}s ban",
        config.limits.max_requests,
        config.limits.window_secs,
        config.limits.ban_secs
    );
    tracing::info!(
        "store capacity: {}, buffer size: {}",
        config.store_capacity,
        config.buffer_size
    );

    let ctx = ServerContext {
        gateway,
        metrics: Arc::new(Metrics::new()),
        limits: SystemInfo {
            requests_per_window: config.limits.max_requests,
            window_seconds: config.limits.window_secs,
            ban_seconds: config.limits.ban_secs,
        },
    };

    tracing::info!(
        "starting HTTP transport on {}:{}",
        config.http.host,
        config.http.port
    );
    let transport = HttpTransport::new(&config.http.host, config.http.port)?;
    transport.start(ctx).await
}
