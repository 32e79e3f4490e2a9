mod catalog;
mod config;
mod errors;
mod export;
mod llm_client;
mod models;
mod pipeline;
mod routes;
mod state;
mod translation;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::catalog::DietCatalog;
use crate::config::Config;
use crate::llm_client::build_http_client;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed numeric env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Dietbot API v{}", env!("CARGO_PKG_VERSION"));

    // Load and validate the diet catalog
    let catalog = DietCatalog::load(config.diet_catalog_path.as_deref())?;
    info!("Diet catalog loaded: {} diets", catalog.len());

    // Shared HTTP client for the language model
    let http = build_http_client(Duration::from_secs(config.llm_timeout_secs))?;
    info!(
        "LLM models: extraction={}, menu={}",
        config.extraction_model, config.menu_model
    );
    if config.anthropic_api_key.is_none() {
        warn!("ANTHROPIC_API_KEY not set; requests must carry their own api_key");
    }

    let state = AppState {
        config: config.clone(),
        catalog: Arc::new(catalog),
        http,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the web client domain is fixed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
