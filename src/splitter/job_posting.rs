//! Splitter tuned for job postings.

use crate::error::ConfigError;
use crate::processing::normalizer::clean_structure;
use crate::types::SummarizerConfig;

use super::base::TextSplitter;
use super::semantic::SemanticSplitter;

/// Section structure first, then generic paragraph and sentence breaks.
pub const JOB_POSTING_SEPARATORS: &[&str] = &[
    "\n## ",  // Section headers
    "\n### ", // Sub-sections
    "\n**",   // Emphasis
    "\n- ",   // List items
    "\n\n",   // Paragraphs
    ". ",     // Sentences
    "\n",     // Lines
    " ",      // Words
    "",       // Characters
];

/// Cleans scraped markup and splits along posting sections.
#[derive(Debug, Clone)]
pub struct JobPostingSplitter {
    inner: SemanticSplitter,
}

impl JobPostingSplitter {
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Result<Self, ConfigError> {
        let inner =
            SemanticSplitter::with_separators(chunk_size, chunk_overlap, JOB_POSTING_SEPARATORS.to_vec())?;
        Ok(Self { inner })
    }

    pub fn from_config(config: &SummarizerConfig) -> Result<Self, ConfigError> {
        Self::new(config.chunk_size, config.chunk_overlap)
    }

    pub fn chunk_size(&self) -> usize {
        self.inner.chunk_size()
    }

    /// Strip tags and stray symbols, then split.
    ///
    /// Unlike [`crate::processing::normalize`] the pre-clean keeps repeated
    /// lines, so list items that legitimately repeat are not lost.
    pub fn split_job_posting(&self, content: &str) -> Vec<String> {
        let cleaned = clean_structure(content);
        self.inner.split_text(&cleaned)
    }
}

impl TextSplitter for JobPostingSplitter {
    fn name(&self) -> &'static str {
        "job_posting"
    }

    fn description(&self) -> &'static str {
        "Splits job postings along headers, emphasis and list items"
    }

    fn split(&self, text: &str) -> Vec<String> {
        self.split_job_posting(text)
    }
}
