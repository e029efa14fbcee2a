//! HTTP request handlers for the analysis service.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::info;

use crate::error::ConfigError;
use crate::pipeline::ContentAnalyzer;
use crate::splitter::{char_len, ChunkInfo, JobPostingSplitter};
use crate::types::{ContentAnalysis, SettingsUpdate, SummarizerConfig};

/// Application state shared across handlers.
pub struct AppState {
    pub analyzer: RwLock<ContentAnalyzer>,
}

impl AppState {
    pub fn new(config: SummarizerConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            analyzer: RwLock::new(ContentAnalyzer::new(config)?),
        })
    }
}

/// Errors returned to HTTP clients as `{"error": "..."}`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("bad request: {0}")]
    BadRequest(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Config(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
        };

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    status: String,
    version: String,
}

/// Health check endpoint.
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Active configuration.
pub async fn get_config(State(state): State<Arc<AppState>>) -> Json<SummarizerConfig> {
    let analyzer = state.analyzer.read().await;
    Json(analyzer.config().clone())
}

/// Apply a partial settings change. Invalid settings leave the active ones in place.
pub async fn update_config(
    State(state): State<Arc<AppState>>,
    Json(update): Json<SettingsUpdate>,
) -> Result<Json<SummarizerConfig>, ApiError> {
    let mut analyzer = state.analyzer.write().await;
    let config = analyzer.config().apply(&update)?;
    *analyzer = ContentAnalyzer::new(config.clone())?;

    info!(
        chunk_size = config.chunk_size,
        chunk_overlap = config.chunk_overlap,
        max_workers = config.max_workers,
        "Settings updated"
    );
    Ok(Json(config))
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub content: String,
}

/// Size analysis of a posting, with a processing plan when it is over budget.
pub async fn analyze(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AnalyzeRequest>,
) -> Json<ContentAnalysis> {
    let analyzer = state.analyzer.read().await;
    let analysis = analyzer.analyze(&request.content);

    info!(
        chars = analysis.validation.stats.char_count,
        tokens = analysis.validation.stats.estimated_tokens,
        action = %analysis.validation.stats.recommended_action,
        "Analyzed content"
    );
    Json(analysis)
}

#[derive(Debug, Deserialize)]
pub struct SplitRequest {
    pub content: String,
    #[serde(default)]
    pub chunk_size: Option<usize>,
    #[serde(default)]
    pub chunk_overlap: Option<usize>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChunkView {
    pub index: usize,
    pub chars: usize,
    pub content: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SplitResponse {
    pub info: ChunkInfo,
    pub chunks: Vec<ChunkView>,
}

/// Split a posting with the active settings or per-request overrides.
pub async fn split(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SplitRequest>,
) -> Result<Json<SplitResponse>, ApiError> {
    if request.content.trim().is_empty() {
        return Err(ApiError::BadRequest("content is empty".to_string()));
    }

    let splitter = {
        let analyzer = state.analyzer.read().await;
        let config = analyzer.config();
        JobPostingSplitter::new(
            request.chunk_size.unwrap_or(config.chunk_size),
            request.chunk_overlap.unwrap_or(config.chunk_overlap),
        )?
    };

    let chunks = splitter.split_job_posting(&request.content);
    let info = ChunkInfo::from_chunks(char_len(&request.content), &chunks);

    Ok(Json(SplitResponse {
        info,
        chunks: chunks
            .into_iter()
            .enumerate()
            .map(|(index, content)| ChunkView {
                index,
                chars: char_len(&content),
                content,
            })
            .collect(),
    }))
}
