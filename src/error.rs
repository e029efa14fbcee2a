//! Error types for configuration, the summary backend and the pipeline.

use std::fmt;
use std::time::Duration;

use thiserror::Error;

/// Invalid or unloadable configuration. Fatal at construction time.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for `{field}`: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),
}

impl ConfigError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field,
            reason: reason.into(),
        }
    }
}

/// Failure reported by a summary backend for a single invocation.
#[derive(Debug, Clone, Error)]
pub enum BackendError {
    #[error("transport failure: {0}")]
    Transport(String),

    #[error("backend timed out after {0:?}")]
    Timeout(Duration),

    #[error("generation failed: {0}")]
    Generation(String),

    #[error("malformed response: {0}")]
    MalformedResponse(String),

    #[error("missing prompt variable: {0}")]
    MissingVariable(String),
}

/// Why a single map task did not produce a summary.
///
/// These never abort the pipeline; they are embedded in the reduce input.
#[derive(Debug, Clone, Error)]
pub enum ChunkFailure {
    #[error("{0}")]
    Backend(#[from] BackendError),

    #[error("timed out after {0:?}")]
    TimedOut(Duration),

    #[error("worker panicked: {0}")]
    Panicked(String),

    #[error("worker pool shut down before the task started")]
    Cancelled,
}

/// The pipeline stage at which a fatal error happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Whole content summarized in one call.
    Direct,
    /// Content split into exactly one chunk and combined directly.
    SingleChunk,
    /// A reduce round (1-based).
    Reduce { round: usize },
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Direct => write!(f, "direct"),
            Stage::SingleChunk => write!(f, "single-chunk"),
            Stage::Reduce { round } => write!(f, "reduce round {}", round),
        }
    }
}

/// Fatal summarization error surfaced to the caller.
#[derive(Debug, Error)]
pub enum SummarizeError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("content is empty after normalization")]
    EmptyContent,

    #[error("{stage} stage failed: {source}")]
    Backend {
        stage: Stage,
        #[source]
        source: BackendError,
    },

    #[error("{stage} stage worker failed: {message}")]
    Worker { stage: Stage, message: String },
}

impl SummarizeError {
    /// Stage that failed, if the error came from a backend call.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            SummarizeError::Backend { stage, .. } | SummarizeError::Worker { stage, .. } => {
                Some(*stage)
            }
            _ => None,
        }
    }
}
