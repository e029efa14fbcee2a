//! Iterative reduction of map results.

use std::sync::Arc;

use tracing::{debug, info};

use crate::backend::SummaryBackend;
use crate::error::{Stage, SummarizeError};
use crate::splitter::char_len;
use crate::types::{MapResult, PromptKind};

use super::invoke_blocking;

/// Summaries combined per intermediate reduce call.
pub const REDUCE_BATCH_SIZE: usize = 3;

/// Final summary and the number of reduce rounds it took.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reduction {
    pub summary: String,
    pub rounds: usize,
}

/// Folds map results into one summary.
///
/// While the numbered combination of the working list is longer than the
/// threshold and more than two items remain, each batch of three items is
/// reduced to one. The surviving items are then combined in a final call.
/// Each batching round shrinks the list by a factor of three, so `n` results
/// need at most `ceil(log3(n)) + 1` rounds.
#[derive(Debug, Clone, Copy)]
pub struct Reducer {
    threshold: usize,
}

impl Reducer {
    pub fn new(threshold: usize) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> usize {
        self.threshold
    }

    /// Any backend failure here is fatal and names the round it happened in.
    pub async fn reduce(
        &self,
        backend: &Arc<dyn SummaryBackend>,
        results: &[MapResult],
    ) -> Result<Reduction, SummarizeError> {
        let mut items: Vec<String> = results.iter().map(MapResult::render).collect();
        let mut round = 0;

        loop {
            round += 1;
            let combined = number_sections(&items);

            if items.len() <= 2 || char_len(&combined) <= self.threshold {
                debug!(round, items = items.len(), "Final reduce");
                let summary =
                    invoke_blocking(backend, PromptKind::Reduce, combined, Stage::Reduce { round })
                        .await?;
                return Ok(Reduction {
                    summary,
                    rounds: round,
                });
            }

            info!(
                round,
                items = items.len(),
                combined_chars = char_len(&combined),
                "Combined summaries exceed threshold, reducing in batches"
            );

            let batches = (items.len() + REDUCE_BATCH_SIZE - 1) / REDUCE_BATCH_SIZE;
            let mut next = Vec::with_capacity(batches);
            for batch in items.chunks(REDUCE_BATCH_SIZE) {
                let summary = invoke_blocking(
                    backend,
                    PromptKind::Reduce,
                    batch.join("\n\n"),
                    Stage::Reduce { round },
                )
                .await?;
                next.push(summary);
            }
            items = next;
        }
    }
}

/// Join summaries under numbered section headers.
pub(crate) fn number_sections(items: &[String]) -> String {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| format!("=== Summary {} ===\n{}", i + 1, item))
        .collect::<Vec<_>>()
        .join("\n\n")
}
