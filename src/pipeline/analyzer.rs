//! Size analysis and processing plans. Needs no backend.

use crate::error::ConfigError;
use crate::processing::{normalize, TokenEstimator};
use crate::splitter::{JobPostingSplitter, TextSplitter};
use crate::types::{ContentAnalysis, ProcessingPlan, SizeValidation, SummarizerConfig};

/// Rough wall-clock cost of one map call, used for plan estimates.
const SECS_PER_CHUNK: u64 = 10;

/// Estimates, validates and splits content with one configuration.
#[derive(Debug, Clone)]
pub struct ContentAnalyzer {
    config: SummarizerConfig,
    estimator: TokenEstimator,
    splitter: JobPostingSplitter,
}

impl ContentAnalyzer {
    pub fn new(config: SummarizerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            estimator: TokenEstimator::from_config(&config),
            splitter: JobPostingSplitter::from_config(&config)?,
            config,
        })
    }

    pub fn config(&self) -> &SummarizerConfig {
        &self.config
    }

    /// Validate already-normalized text against the configured budget.
    pub fn validate(&self, normalized: &str) -> SizeValidation {
        self.estimator
            .validate(normalized, self.config.strict_validation)
    }

    /// Split already-normalized text with the job-posting splitter.
    pub fn split(&self, normalized: &str) -> Vec<String> {
        self.splitter.split_job_posting(normalized)
    }

    /// Normalize and validate; attach a plan only when the content is over budget.
    pub fn analyze(&self, content: &str) -> ContentAnalysis {
        let normalized = normalize(content);
        let validation = self.validate(&normalized);
        let plan = if validation.needs_processing {
            Some(self.plan(&normalized))
        } else {
            None
        };

        ContentAnalysis { validation, plan }
    }

    /// How `content` would be chunked and roughly how long mapping it would take.
    pub fn plan(&self, content: &str) -> ProcessingPlan {
        let info = self.splitter.chunk_info(content);

        ProcessingPlan {
            content_length: info.total_length,
            estimated_chunks: info.num_chunks,
            avg_chunk_size: info.avg_chunk_size,
            estimated_processing_secs: info.num_chunks as u64 * SECS_PER_CHUNK,
            recommended_max_workers: info.num_chunks.min(self.config.max_workers),
            chunk_sizes: info.chunk_sizes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_content_has_no_plan() {
        let analyzer = ContentAnalyzer::new(SummarizerConfig::default()).unwrap();
        let analysis = analyzer.analyze("<p>Backend engineer wanted. Rust, Go, Kubernetes.</p>");

        assert!(!analysis.validation.needs_processing);
        assert!(analysis.plan.is_none());
    }

    #[test]
    fn test_long_content_gets_plan() {
        let config = SummarizerConfig::default()
            .with_chunk_size(500)
            .with_overlap(50)
            .with_max_tokens(100)
            .with_max_workers(3);
        let analyzer = ContentAnalyzer::new(config).unwrap();
        let content = "We build payment infrastructure for online stores. ".repeat(60);

        let analysis = analyzer.analyze(&content);
        let plan = analysis.plan.expect("over-budget content has a plan");

        assert!(analysis.validation.needs_processing);
        assert!(plan.estimated_chunks >= 6);
        assert_eq!(plan.chunk_sizes.len(), plan.estimated_chunks);
        assert_eq!(plan.estimated_processing_secs, plan.estimated_chunks as u64 * 10);
        assert_eq!(plan.recommended_max_workers, 3);
        assert!(plan.chunk_sizes.iter().all(|&size| size <= 500));
    }

    #[test]
    fn test_strict_validation_is_applied() {
        let config = SummarizerConfig {
            strict_validation: true,
            max_tokens: 100,
            ..SummarizerConfig::default()
        };
        let analyzer = ContentAnalyzer::new(config).unwrap();
        assert_eq!(analyzer.validate("word").limit_used, 80.0);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = SummarizerConfig::default().with_chunk_size(100).with_overlap(150);
        assert!(ContentAnalyzer::new(config).is_err());
    }
}
