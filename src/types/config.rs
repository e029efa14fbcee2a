//! Configuration types for summarization.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::splitter::validate_chunk_bounds;
use crate::{
    DEFAULT_CHARS_PER_TOKEN, DEFAULT_CHUNK_OVERLAP, DEFAULT_CHUNK_SIZE, DEFAULT_MAP_TASK_TIMEOUT_MS,
    DEFAULT_MAX_TOKENS, DEFAULT_MAX_WORKERS, DEFAULT_REDUCE_RECURSION_THRESHOLD,
};

/// Prefix for environment variable overrides, e.g. `JD_SUMMARIZER_CHUNK_SIZE`.
pub const ENV_PREFIX: &str = "JD_SUMMARIZER";

/// Immutable settings shared by the estimator, splitter and orchestrator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SummarizerConfig {
    /// Maximum characters per chunk, overlap included
    pub chunk_size: usize,

    /// Characters carried over from the previous chunk
    pub chunk_overlap: usize,

    /// Token budget for direct processing
    pub max_tokens: usize,

    /// Average characters per token used by the estimator
    pub chars_per_token: f64,

    /// Width of the map worker pool
    pub max_workers: usize,

    /// Combined reduce input above this many characters is reduced in batches
    pub reduce_recursion_threshold: usize,

    /// Per-chunk map timeout in milliseconds
    pub map_task_timeout_ms: u64,

    /// Use 80% of `max_tokens` as the direct-processing limit
    pub strict_validation: bool,
}

impl Default for SummarizerConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            chunk_overlap: DEFAULT_CHUNK_OVERLAP,
            max_tokens: DEFAULT_MAX_TOKENS,
            chars_per_token: DEFAULT_CHARS_PER_TOKEN,
            max_workers: DEFAULT_MAX_WORKERS,
            reduce_recursion_threshold: DEFAULT_REDUCE_RECURSION_THRESHOLD,
            map_task_timeout_ms: DEFAULT_MAP_TASK_TIMEOUT_MS,
            strict_validation: false,
        }
    }
}

impl SummarizerConfig {
    /// Load configuration from defaults, an optional TOML file and the environment.
    ///
    /// Later sources win: file values override defaults and `JD_SUMMARIZER_*`
    /// variables override the file. The result is validated before it is returned.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = config::Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(false));
        }

        let settings = builder
            .add_source(config::Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?
            .try_deserialize::<SummarizerConfig>()?;

        settings.validate()?;
        Ok(settings)
    }

    /// Load configuration from environment variables only.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::load(None)
    }

    /// Create a config with the given chunk size.
    pub fn with_chunk_size(mut self, size: usize) -> Self {
        self.chunk_size = size;
        self
    }

    /// Set the overlap.
    pub fn with_overlap(mut self, overlap: usize) -> Self {
        self.chunk_overlap = overlap;
        self
    }

    /// Set the token budget.
    pub fn with_max_tokens(mut self, max_tokens: usize) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Set the map worker pool width.
    pub fn with_max_workers(mut self, workers: usize) -> Self {
        self.max_workers = workers;
        self
    }

    /// Set the reduce recursion threshold.
    pub fn with_reduce_threshold(mut self, threshold: usize) -> Self {
        self.reduce_recursion_threshold = threshold;
        self
    }

    /// Set the per-chunk map timeout.
    pub fn with_map_timeout(mut self, timeout: Duration) -> Self {
        self.map_task_timeout_ms = (timeout.as_millis() as u64).max(1);
        self
    }

    /// Per-chunk map timeout as a [`Duration`].
    pub fn map_task_timeout(&self) -> Duration {
        Duration::from_millis(self.map_task_timeout_ms)
    }

    /// Check every threshold. Called before any component is built.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_chunk_bounds(self.chunk_size, self.chunk_overlap)?;
        if self.max_tokens == 0 {
            return Err(ConfigError::invalid("max_tokens", "must be greater than zero"));
        }
        if !(self.chars_per_token.is_finite() && self.chars_per_token > 0.0) {
            return Err(ConfigError::invalid(
                "chars_per_token",
                format!("{} is not a positive number", self.chars_per_token),
            ));
        }
        if self.max_workers == 0 {
            return Err(ConfigError::invalid("max_workers", "must be greater than zero"));
        }
        if self.reduce_recursion_threshold == 0 {
            return Err(ConfigError::invalid(
                "reduce_recursion_threshold",
                "must be greater than zero",
            ));
        }
        if self.map_task_timeout_ms == 0 {
            return Err(ConfigError::invalid(
                "map_task_timeout_ms",
                "must be greater than zero",
            ));
        }
        Ok(())
    }

    /// Return a copy with the given update applied. The receiver is left untouched.
    pub fn apply(&self, update: &SettingsUpdate) -> Result<Self, ConfigError> {
        let mut next = self.clone();
        if let Some(size) = update.chunk_size {
            next.chunk_size = size;
        }
        if let Some(overlap) = update.chunk_overlap {
            next.chunk_overlap = overlap;
        }
        if let Some(workers) = update.max_workers {
            next.max_workers = workers;
        }
        if let Some(max_tokens) = update.max_tokens {
            next.max_tokens = max_tokens;
        }
        if let Some(ms) = update.map_task_timeout_ms {
            next.map_task_timeout_ms = ms;
        }
        next.validate()?;
        Ok(next)
    }
}

/// Partial settings change. `None` keeps the current value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SettingsUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chunk_size: Option<usize>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub chunk_overlap: Option<usize>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_workers: Option<usize>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<usize>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub map_task_timeout_ms: Option<u64>,
}
