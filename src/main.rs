//! Job Posting Summarizer - Main Entry Point
//!
//! Serves content analysis and splitting over HTTP. Summarization needs a
//! language-model backend and is used through the library.

use anyhow::Result;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use jd_summarizer::api::{self, AppState};
use jd_summarizer::SummarizerConfig;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env before anything reads the environment
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "jd_summarizer=info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config_path = std::env::var("JD_SUMMARIZER_CONFIG").ok().map(PathBuf::from);
    let config = SummarizerConfig::load(config_path.as_deref())?;

    info!("Starting Job Posting Summarizer v{}", env!("CARGO_PKG_VERSION"));
    info!(
        chunk_size = config.chunk_size,
        chunk_overlap = config.chunk_overlap,
        max_tokens = config.max_tokens,
        max_workers = config.max_workers,
        "Loaded configuration"
    );

    let state = Arc::new(AppState::new(config)?);

    // Build HTTP routes
    let app = api::router(state)
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );

    // Start server
    let port = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(3017);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
