//! Core types for the summarization pipeline.

mod config;
mod stats;
mod summary;

pub use config::{SettingsUpdate, SummarizerConfig, ENV_PREFIX};
pub use stats::{ContentAnalysis, ContentStats, ProcessingPlan, RecommendedAction, SizeValidation};
pub use summary::{
    MapOutcome, MapResult, PromptKind, PromptVars, SummaryOutcome, SummaryPath, SummaryReport,
};
