//! Prompt inputs, map results and run reports.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ChunkFailure;

/// Variables handed to the backend for one prompt.
pub type PromptVars = HashMap<String, String>;

/// Which prompt template a backend call is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PromptKind {
    /// Structured summary of the whole posting
    Direct,
    /// Condense a single chunk
    Map,
    /// Combine partial summaries into the structured summary
    Reduce,
}

impl PromptKind {
    /// Template variable this kind populates.
    pub fn variable(&self) -> &'static str {
        match self {
            PromptKind::Direct => "job_content",
            PromptKind::Map | PromptKind::Reduce => "text",
        }
    }

    /// Build the variable map for this kind.
    pub fn vars(&self, value: impl Into<String>) -> PromptVars {
        let mut vars = PromptVars::with_capacity(1);
        vars.insert(self.variable().to_string(), value.into());
        vars
    }
}

impl std::fmt::Display for PromptKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PromptKind::Direct => write!(f, "direct"),
            PromptKind::Map => write!(f, "map"),
            PromptKind::Reduce => write!(f, "reduce"),
        }
    }
}

/// Outcome of summarizing one chunk.
#[derive(Debug, Clone)]
pub enum MapOutcome {
    Success(String),
    Failure(ChunkFailure),
}

/// A map outcome tagged with the index of the chunk it came from.
#[derive(Debug, Clone)]
pub struct MapResult {
    /// Order of the source chunk (0-indexed)
    pub chunk_index: usize,
    pub outcome: MapOutcome,
}

impl MapResult {
    pub fn success(chunk_index: usize, text: String) -> Self {
        Self {
            chunk_index,
            outcome: MapOutcome::Success(text),
        }
    }

    pub fn failure(chunk_index: usize, failure: ChunkFailure) -> Self {
        Self {
            chunk_index,
            outcome: MapOutcome::Failure(failure),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.outcome, MapOutcome::Success(_))
    }

    /// Text contributed to the reduce input. Failures become a visible marker.
    pub fn render(&self) -> String {
        match &self.outcome {
            MapOutcome::Success(text) => text.clone(),
            MapOutcome::Failure(failure) => format!(
                "[processing failed: chunk {}: {}]",
                self.chunk_index + 1,
                failure
            ),
        }
    }
}

/// Route a summarization run took.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SummaryPath {
    Direct,
    SingleChunk,
    MapReduce,
}

/// Diagnostics for one summarization run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryReport {
    pub run_id: Uuid,
    pub path: SummaryPath,
    pub normalized_chars: usize,
    pub estimated_tokens: usize,
    pub chunk_count: usize,
    /// 0-indexed chunks whose map task failed
    pub failed_chunks: Vec<usize>,
    pub reduce_rounds: usize,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

/// Final summary together with its run report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryOutcome {
    pub summary: String,
    pub report: SummaryReport,
}
