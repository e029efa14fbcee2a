//! Summary backend seam.
//!
//! The pipeline never talks to a language model itself. It calls a
//! [`SummaryBackend`] with a prompt kind and the variables for that prompt;
//! how the prompt is rendered and where it is sent is up to the implementor.

pub mod prompts;
mod templated;

pub use prompts::{PromptTemplate, SUMMARY_FORMAT};
pub use templated::TemplatedBackend;

use crate::error::BackendError;
use crate::types::{PromptKind, PromptVars};

/// A synchronous, fallible summarization call.
///
/// Implementations are shared across map workers, so they must be thread-safe.
/// Calls may block for a long time; the pipeline runs them on blocking threads.
pub trait SummaryBackend: Send + Sync {
    /// Run one prompt.
    fn invoke(&self, kind: PromptKind, vars: &PromptVars) -> Result<String, BackendError>;

    /// Name used in logs.
    fn name(&self) -> &str {
        "backend"
    }
}

impl<F> SummaryBackend for F
where
    F: Fn(PromptKind, &PromptVars) -> Result<String, BackendError> + Send + Sync,
{
    fn invoke(&self, kind: PromptKind, vars: &PromptVars) -> Result<String, BackendError> {
        self(kind, vars)
    }

    fn name(&self) -> &str {
        "fn"
    }
}
