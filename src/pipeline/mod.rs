//! Map-reduce summarization pipeline.
//!
//! - [`WorkerPool`] fans chunk summaries out over a bounded number of workers
//! - [`Reducer`] folds the map results into one summary in bounded rounds
//! - [`MapReduceSummarizer`] decides between the direct, single-chunk and
//!   map-reduce paths
//! - [`ContentAnalyzer`] answers size questions without calling a backend

mod analyzer;
mod orchestrator;
mod pool;
mod reduce;

pub use analyzer::ContentAnalyzer;
pub use orchestrator::MapReduceSummarizer;
pub use pool::WorkerPool;
pub use reduce::{Reducer, Reduction, REDUCE_BATCH_SIZE};

use std::sync::Arc;

use tracing::Span;

use crate::backend::SummaryBackend;
use crate::error::{Stage, SummarizeError};
use crate::types::PromptKind;

/// Run one backend call on a blocking thread. Any failure is fatal for `stage`.
pub(crate) async fn invoke_blocking(
    backend: &Arc<dyn SummaryBackend>,
    kind: PromptKind,
    input: String,
    stage: Stage,
) -> Result<String, SummarizeError> {
    let backend = Arc::clone(backend);
    let span = Span::current();

    tokio::task::spawn_blocking(move || {
        let _entered = span.enter();
        backend.invoke(kind, &kind.vars(input))
    })
    .await
    .map_err(|e| SummarizeError::Worker {
        stage,
        message: e.to_string(),
    })?
    .map_err(|source| SummarizeError::Backend { stage, source })
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::{Arc, Mutex};

    use crate::backend::SummaryBackend;
    use crate::error::BackendError;
    use crate::types::{PromptKind, PromptVars};

    /// Records every call and answers through `respond(kind, input)`.
    pub(crate) struct ScriptedBackend<F> {
        calls: Mutex<Vec<(PromptKind, String)>>,
        respond: F,
    }

    impl<F> ScriptedBackend<F>
    where
        F: Fn(PromptKind, &str) -> Result<String, BackendError> + Send + Sync,
    {
        pub(crate) fn new(respond: F) -> Arc<Self> {
            Arc::new(Self {
                calls: Mutex::new(Vec::new()),
                respond,
            })
        }

        pub(crate) fn calls(&self) -> Vec<(PromptKind, String)> {
            self.calls.lock().unwrap().clone()
        }

        pub(crate) fn count(&self, kind: PromptKind) -> usize {
            self.calls().iter().filter(|(k, _)| *k == kind).count()
        }
    }

    impl<F> SummaryBackend for ScriptedBackend<F>
    where
        F: Fn(PromptKind, &str) -> Result<String, BackendError> + Send + Sync,
    {
        fn invoke(&self, kind: PromptKind, vars: &PromptVars) -> Result<String, BackendError> {
            let input = vars.get(kind.variable()).cloned().unwrap_or_default();
            self.calls.lock().unwrap().push((kind, input.clone()));
            (self.respond)(kind, &input)
        }

        fn name(&self) -> &str {
            "scripted"
        }
    }
}
