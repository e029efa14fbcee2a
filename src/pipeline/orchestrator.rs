//! Map-reduce summarization orchestrator.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::backend::SummaryBackend;
use crate::error::{ConfigError, Stage, SummarizeError};
use crate::processing::normalize;
use crate::types::{
    ContentAnalysis, MapResult, ProcessingPlan, PromptKind, SettingsUpdate, SummarizerConfig,
    SummaryOutcome, SummaryPath, SummaryReport,
};

use super::analyzer::ContentAnalyzer;
use super::pool::WorkerPool;
use super::reduce::Reducer;
use super::invoke_blocking;

/// Summarizes job postings of any size through a caller-supplied backend.
///
/// Content that fits the token budget is summarized in one direct call.
/// Larger content is split; a single chunk goes straight to the combine
/// prompt, several chunks are mapped in parallel and then reduced. A failed
/// map call leaves a visible marker in the summary instead of failing the run.
///
/// The configuration is fixed for the lifetime of a summarizer. Use
/// [`MapReduceSummarizer::with_settings`] to get a reconfigured copy.
pub struct MapReduceSummarizer {
    analyzer: ContentAnalyzer,
    backend: Arc<dyn SummaryBackend>,
    pool: WorkerPool,
    reducer: Reducer,
}

impl MapReduceSummarizer {
    pub fn new(
        config: SummarizerConfig,
        backend: Arc<dyn SummaryBackend>,
    ) -> Result<Self, ConfigError> {
        let analyzer = ContentAnalyzer::new(config)?;
        let config = analyzer.config();

        Ok(Self {
            pool: WorkerPool::new(config.max_workers, config.map_task_timeout()),
            reducer: Reducer::new(config.reduce_recursion_threshold),
            analyzer,
            backend,
        })
    }

    pub fn config(&self) -> &SummarizerConfig {
        self.analyzer.config()
    }

    pub fn backend(&self) -> &Arc<dyn SummaryBackend> {
        &self.backend
    }

    /// A new summarizer with `update` applied, sharing this one's backend.
    pub fn with_settings(&self, update: &SettingsUpdate) -> Result<Self, ConfigError> {
        let config = self.config().apply(update)?;
        Self::new(config, Arc::clone(&self.backend))
    }

    pub fn analyze(&self, content: &str) -> ContentAnalysis {
        self.analyzer.analyze(content)
    }

    pub fn plan(&self, content: &str) -> ProcessingPlan {
        self.analyzer.plan(content)
    }

    /// Summarize `content`.
    pub async fn summarize(&self, content: &str) -> Result<String, SummarizeError> {
        Ok(self.summarize_with_report(content).await?.summary)
    }

    /// Summarize `content` and report how the run went.
    pub async fn summarize_with_report(
        &self,
        content: &str,
    ) -> Result<SummaryOutcome, SummarizeError> {
        let run_id = Uuid::new_v4();
        let span = info_span!("summarize", run_id = %run_id, backend = self.backend.name());
        self.run(run_id, content).instrument(span).await
    }

    async fn run(&self, run_id: Uuid, content: &str) -> Result<SummaryOutcome, SummarizeError> {
        let started_at = Utc::now();

        let normalized = normalize(content);
        if normalized.is_empty() {
            warn!(raw_chars = content.chars().count(), "Nothing left after normalization");
            return Err(SummarizeError::EmptyContent);
        }

        let validation = self.analyzer.validate(&normalized);
        let mut report = SummaryReport {
            run_id,
            path: SummaryPath::Direct,
            normalized_chars: validation.stats.char_count,
            estimated_tokens: validation.stats.estimated_tokens,
            chunk_count: 0,
            failed_chunks: Vec::new(),
            reduce_rounds: 0,
            started_at,
            finished_at: started_at,
        };

        let summary = if !validation.needs_processing {
            info!(
                tokens = validation.stats.estimated_tokens,
                limit = validation.limit_used,
                "Content fits the token budget, summarizing directly"
            );
            invoke_blocking(&self.backend, PromptKind::Direct, normalized, Stage::Direct).await?
        } else {
            let mut chunks = self.analyzer.split(&normalized);
            report.chunk_count = chunks.len();

            if chunks.is_empty() {
                return Err(SummarizeError::EmptyContent);
            }

            if chunks.len() == 1 {
                info!(
                    tokens = validation.stats.estimated_tokens,
                    "Content is a single chunk, combining directly"
                );
                report.path = SummaryPath::SingleChunk;
                let chunk = chunks.remove(0);
                invoke_blocking(&self.backend, PromptKind::Reduce, chunk, Stage::SingleChunk)
                    .await?
            } else {
                info!(
                    chunks = chunks.len(),
                    workers = self.pool.width(),
                    action = %validation.stats.recommended_action,
                    "Starting map-reduce"
                );
                report.path = SummaryPath::MapReduce;

                let results = self.pool.map_chunks(Arc::clone(&self.backend), chunks).await;
                report.failed_chunks = results
                    .iter()
                    .filter(|r| !r.is_success())
                    .map(|r| r.chunk_index)
                    .collect();
                if !report.failed_chunks.is_empty() {
                    warn!(
                        failed = report.failed_chunks.len(),
                        total = results.len(),
                        "Reducing with partial map results"
                    );
                }

                self.reduce(&results, &mut report).await?
            }
        };

        report.finished_at = Utc::now();
        info!(
            path = ?report.path,
            reduce_rounds = report.reduce_rounds,
            elapsed_ms = (report.finished_at - report.started_at).num_milliseconds(),
            "Summary complete"
        );

        Ok(SummaryOutcome { summary, report })
    }

    async fn reduce(
        &self,
        results: &[MapResult],
        report: &mut SummaryReport,
    ) -> Result<String, SummarizeError> {
        let reduction = self.reducer.reduce(&self.backend, results).await?;
        report.reduce_rounds = reduction.rounds;
        Ok(reduction.summary)
    }
}

impl std::fmt::Debug for MapReduceSummarizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MapReduceSummarizer")
            .field("config", self.config())
            .field("backend", &self.backend.name())
            .finish()
    }
}
