//! Job Posting Summarizer Library
//!
//! Summarizes scraped job postings of any length through a pluggable
//! language-model backend. Short postings are summarized in one call; long
//! ones are split along their section structure, condensed chunk by chunk on
//! a bounded worker pool, and folded back into one structured summary.

pub mod api;
pub mod backend;
pub mod error;
pub mod pipeline;
pub mod processing;
pub mod splitter;
pub mod types;

pub use backend::{PromptTemplate, SummaryBackend, TemplatedBackend};
pub use error::{BackendError, ChunkFailure, ConfigError, Stage, SummarizeError};
pub use pipeline::{ContentAnalyzer, MapReduceSummarizer};
pub use processing::{normalize, TokenEstimator};
pub use splitter::{JobPostingSplitter, SemanticSplitter, TextSplitter};
pub use types::{SettingsUpdate, SummarizerConfig, SummaryOutcome, SummaryReport};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::backend::*;
    pub use crate::error::*;
    pub use crate::pipeline::{ContentAnalyzer, MapReduceSummarizer};
    pub use crate::processing::*;
    pub use crate::splitter::*;
    pub use crate::types::*;
}

/// Default chunk size in characters
pub const DEFAULT_CHUNK_SIZE: usize = 3000;

/// Default chunk overlap in characters
pub const DEFAULT_CHUNK_OVERLAP: usize = 200;

/// Default token budget for direct processing
pub const DEFAULT_MAX_TOKENS: usize = 4096;

/// Default average characters per token
pub const DEFAULT_CHARS_PER_TOKEN: f64 = 3.5;

/// Default width of the map worker pool
pub const DEFAULT_MAX_WORKERS: usize = 3;

/// Combined reduce input above this many characters is reduced in batches
pub const DEFAULT_REDUCE_RECURSION_THRESHOLD: usize = 8000;

/// Default per-chunk map timeout (3 minutes)
pub const DEFAULT_MAP_TASK_TIMEOUT_MS: u64 = 180_000;
