//! Size statistics and processing plans derived from content.

use serde::{Deserialize, Serialize};

/// How content of a given size should be handled.
///
/// Advisory only: the orchestrator branches on [`SizeValidation::needs_processing`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendedAction {
    /// Fits the budget, summarize in one call
    Direct,
    /// Up to twice the budget
    SimpleChunk,
    /// Up to five times the budget
    MapReduce,
    /// Anything larger
    AdvancedMapReduce,
}

impl RecommendedAction {
    /// Classify an estimated token count against a limit.
    pub fn classify(estimated_tokens: usize, limit: f64) -> Self {
        let tokens = estimated_tokens as f64;
        if tokens <= limit {
            RecommendedAction::Direct
        } else if tokens < limit * 2.0 {
            RecommendedAction::SimpleChunk
        } else if tokens < limit * 5.0 {
            RecommendedAction::MapReduce
        } else {
            RecommendedAction::AdvancedMapReduce
        }
    }

    /// Human-readable description.
    pub fn description(&self) -> &'static str {
        match self {
            RecommendedAction::Direct => "can be processed directly",
            RecommendedAction::SimpleChunk => "needs simple chunking",
            RecommendedAction::MapReduce => "map-reduce recommended",
            RecommendedAction::AdvancedMapReduce => "advanced chunking and map-reduce required",
        }
    }
}

impl std::fmt::Display for RecommendedAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecommendedAction::Direct => write!(f, "direct"),
            RecommendedAction::SimpleChunk => write!(f, "simple_chunk"),
            RecommendedAction::MapReduce => write!(f, "map_reduce"),
            RecommendedAction::AdvancedMapReduce => write!(f, "advanced_map_reduce"),
        }
    }
}

/// Estimated cost of a text. Recomputed for every new input.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContentStats {
    pub char_count: usize,
    pub estimated_tokens: usize,
    pub word_count: usize,
    pub is_over_limit: bool,
    pub recommended_action: RecommendedAction,
}

/// Result of checking a text against the token budget.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SizeValidation {
    pub is_valid: bool,
    pub stats: ContentStats,
    /// Token limit actually applied (80% of the budget in strict mode)
    pub limit_used: f64,
    pub usage_percentage: f64,
    pub needs_processing: bool,
}

/// Expected shape of a map-reduce run over some content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessingPlan {
    pub content_length: usize,
    pub estimated_chunks: usize,
    pub avg_chunk_size: usize,
    /// Rough wall-clock estimate at ten seconds per chunk
    pub estimated_processing_secs: u64,
    pub recommended_max_workers: usize,
    pub chunk_sizes: Vec<usize>,
}

/// Validation of normalized content, plus a plan when it is over budget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentAnalysis {
    pub validation: SizeValidation,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan: Option<ProcessingPlan>,
}
