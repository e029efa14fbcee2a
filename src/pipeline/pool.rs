//! Bounded worker pool for the map phase.

use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::future::join_all;
use tokio::sync::Semaphore;
use tracing::{debug, warn, Span};

use crate::backend::SummaryBackend;
use crate::error::ChunkFailure;
use crate::types::{MapOutcome, MapResult, PromptKind};

/// Runs one map call per chunk with at most `width` calls in flight.
///
/// Every task ends in a [`MapResult`]: backend errors, timeouts and panics are
/// recorded as failures for that chunk and never affect the other tasks.
/// A timed-out call is abandoned, not cancelled: the chunk is marked as timed
/// out right away, but its worker slot stays taken until the blocking call
/// returns, so no more than `width` backend calls ever run at once.
#[derive(Debug, Clone)]
pub struct WorkerPool {
    width: usize,
    task_timeout: Duration,
    permits: Arc<Semaphore>,
}

impl WorkerPool {
    pub fn new(width: usize, task_timeout: Duration) -> Self {
        let width = width.max(1);
        Self {
            width,
            task_timeout,
            permits: Arc::new(Semaphore::new(width)),
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn task_timeout(&self) -> Duration {
        self.task_timeout
    }

    /// Summarize every chunk. Results come back in chunk order.
    pub async fn map_chunks(
        &self,
        backend: Arc<dyn SummaryBackend>,
        chunks: Vec<String>,
    ) -> Vec<MapResult> {
        let tasks = chunks.into_iter().enumerate().map(|(index, chunk)| {
            let backend = Arc::clone(&backend);
            let permits = Arc::clone(&self.permits);
            self.run_task(backend, permits, index, chunk)
        });

        join_all(tasks).await
    }

    async fn run_task(
        &self,
        backend: Arc<dyn SummaryBackend>,
        permits: Arc<Semaphore>,
        index: usize,
        chunk: String,
    ) -> MapResult {
        let permit = match permits.acquire_owned().await {
            Ok(permit) => permit,
            Err(_) => return MapResult::failure(index, ChunkFailure::Cancelled),
        };

        let started = Instant::now();
        let span = Span::current();
        let handle = tokio::task::spawn_blocking(move || {
            // Released when the call returns, even if the task already timed out.
            let _permit = permit;
            let _entered = span.enter();
            backend.invoke(PromptKind::Map, &PromptKind::Map.vars(chunk))
        });

        let result = match tokio::time::timeout(self.task_timeout, handle).await {
            Ok(Ok(Ok(summary))) => MapResult::success(index, summary),
            Ok(Ok(Err(e))) => MapResult::failure(index, ChunkFailure::Backend(e)),
            Ok(Err(join_error)) => {
                MapResult::failure(index, ChunkFailure::Panicked(join_error.to_string()))
            }
            Err(_) => MapResult::failure(index, ChunkFailure::TimedOut(self.task_timeout)),
        };

        let elapsed_ms = started.elapsed().as_millis() as u64;
        match &result.outcome {
            MapOutcome::Success(summary) => debug!(
                chunk = index + 1,
                elapsed_ms,
                summary_chars = summary.chars().count(),
                "Map task finished"
            ),
            MapOutcome::Failure(failure) => warn!(
                chunk = index + 1,
                elapsed_ms,
                error = %failure,
                "Map task failed, continuing with partial results"
            ),
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::error::BackendError;
    use crate::pipeline::testing::ScriptedBackend;

    fn chunks(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("chunk-{}", i)).collect()
    }

    #[tokio::test]
    async fn test_results_keep_chunk_order() {
        let backend = ScriptedBackend::new(|_, input: &str| {
            // Earlier chunks finish last.
            let index: u64 = input.trim_start_matches("chunk-").parse().unwrap();
            std::thread::sleep(Duration::from_millis(60 - index * 10));
            Ok(format!("summary of {}", input))
        });
        let pool = WorkerPool::new(3, Duration::from_secs(5));

        let results = pool.map_chunks(backend.clone(), chunks(6)).await;

        assert_eq!(results.len(), 6);
        for (i, result) in results.iter().enumerate() {
            assert_eq!(result.chunk_index, i);
            assert_eq!(result.render(), format!("summary of chunk-{}", i));
        }
        assert_eq!(backend.count(PromptKind::Map), 6);
    }

    #[tokio::test]
    async fn test_width_bounds_concurrency() {
        let active = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));
        let (active_ref, peak_ref) = (Arc::clone(&active), Arc::clone(&peak));

        let backend = ScriptedBackend::new(move |_, _: &str| {
            let now = active_ref.fetch_add(1, Ordering::SeqCst) + 1;
            peak_ref.fetch_max(now, Ordering::SeqCst);
            std::thread::sleep(Duration::from_millis(20));
            active_ref.fetch_sub(1, Ordering::SeqCst);
            Ok("ok".to_string())
        });
        let pool = WorkerPool::new(2, Duration::from_secs(5));

        let results = pool.map_chunks(backend, chunks(8)).await;

        assert!(results.iter().all(MapResult::is_success));
        assert!(peak.load(Ordering::SeqCst) <= 2);
        assert_eq!(active.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_failure_is_contained() {
        let backend = ScriptedBackend::new(|_, input: &str| {
            if input == "chunk-1" {
                Err(BackendError::Generation("model overloaded".into()))
            } else {
                Ok(input.to_uppercase())
            }
        });
        let pool = WorkerPool::new(3, Duration::from_secs(5));

        let results = pool.map_chunks(backend, chunks(3)).await;

        assert!(results[0].is_success());
        assert!(!results[1].is_success());
        assert!(results[2].is_success());
        assert_eq!(
            results[1].render(),
            "[processing failed: chunk 2: generation failed: model overloaded]"
        );
    }

    #[tokio::test]
    async fn test_slow_chunk_times_out_alone() {
        let backend = ScriptedBackend::new(|_, input: &str| {
            if input == "chunk-0" {
                std::thread::sleep(Duration::from_millis(400));
            }
            Ok("done".to_string())
        });
        let pool = WorkerPool::new(3, Duration::from_millis(100));

        let results = pool.map_chunks(backend, chunks(3)).await;

        assert!(matches!(
            results[0].outcome,
            MapOutcome::Failure(ChunkFailure::TimedOut(_))
        ));
        assert!(results[1].is_success());
        assert!(results[2].is_success());
    }

    #[tokio::test]
    async fn test_timed_out_calls_keep_their_slot() {
        let active = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));
        let (active_ref, peak_ref) = (Arc::clone(&active), Arc::clone(&peak));

        let backend = ScriptedBackend::new(move |_, _: &str| {
            let now = active_ref.fetch_add(1, Ordering::SeqCst) + 1;
            peak_ref.fetch_max(now, Ordering::SeqCst);
            std::thread::sleep(Duration::from_millis(150));
            active_ref.fetch_sub(1, Ordering::SeqCst);
            Ok("late".to_string())
        });
        let pool = WorkerPool::new(1, Duration::from_millis(30));

        let results = pool.map_chunks(backend, chunks(4)).await;

        assert!(results
            .iter()
            .all(|r| matches!(r.outcome, MapOutcome::Failure(ChunkFailure::TimedOut(_)))));
        assert_eq!(peak.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_panicking_backend_becomes_failure() {
        let backend = ScriptedBackend::new(|_, input: &str| {
            if input == "chunk-2" {
                panic!("backend bug");
            }
            Ok("fine".to_string())
        });
        let pool = WorkerPool::new(2, Duration::from_secs(5));

        let results = pool.map_chunks(backend, chunks(3)).await;

        assert!(results[0].is_success());
        assert!(matches!(
            results[2].outcome,
            MapOutcome::Failure(ChunkFailure::Panicked(_))
        ));
    }

    #[test]
    fn test_zero_width_is_clamped() {
        let pool = WorkerPool::new(0, Duration::from_secs(1));
        assert_eq!(pool.width(), 1);
    }
}
