//! Blog Extractor — Binary Entrypoint
//! Boots the Axum HTTP server: config, tracing, metrics, routes.

use std::net::SocketAddr;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use blog_extractor::api::{self, AppState};
use blog_extractor::config::ServerConfig;
use blog_extractor::metrics::Metrics;

/// Compact logs by default, JSON lines when `LOG_FORMAT=json`.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("blog_extractor=info,tower_http=info,warn"));

    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer().compact()).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env in local/dev; no-op when absent.
    let _ = dotenvy::dotenv();
    init_tracing();

    let cfg = ServerConfig::from_env();
    let metrics = Metrics::init()?;
    let state = AppState::from_config(&cfg)?;
    let router = api::create_router(state).merge(metrics.router());

    let addr = SocketAddr::from(([0, 0, 0, 0], cfg.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    info!(%addr, log_dir = %cfg.log_dir.display(), "blog extractor listening");

    axum::serve(listener, router).await.context("http server")?;
    Ok(())
}
