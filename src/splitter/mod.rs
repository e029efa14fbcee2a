//! Splitting strategies for oversized content.

mod base;
mod job_posting;
mod semantic;

pub use base::{char_len, ChunkInfo, TextSplitter};
pub(crate) use base::validate_chunk_bounds;
pub use job_posting::{JobPostingSplitter, JOB_POSTING_SEPARATORS};
pub use semantic::{split_text, SemanticSplitter, DEFAULT_SEPARATORS};
