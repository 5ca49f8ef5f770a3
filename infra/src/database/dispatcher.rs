//! Background write dispatch.
//!
//! The persistence subsystem owns its fire-and-forget dispatch instead of
//! leaning on a host scheduler: jobs are spawned onto the tokio runtime
//! and only an in-flight count is kept. Callers never observe a job's
//! completion or failure; ordering between two dispatched jobs is not
//! guaranteed.

use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Fire-and-forget task dispatcher with shutdown draining.
///
/// Cloning shares the in-flight counter, so an executor clone handed to a
/// repository still drains together with the original.
#[derive(Clone, Debug, Default)]
pub struct WriteDispatcher {
    in_flight: Arc<AtomicUsize>,
}

impl WriteDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn a job onto the runtime. Must be called from within a tokio
    /// runtime context (the executor's callers already are).
    pub fn dispatch<F>(&self, job: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let counter = Arc::clone(&self.in_flight);
        counter.fetch_add(1, Ordering::SeqCst);
        tokio::spawn(async move {
            job.await;
            counter.fetch_sub(1, Ordering::SeqCst);
        });
    }

    /// Number of dispatched jobs that have not finished yet.
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Wait until every dispatched job has finished. Used on shutdown so
    /// queued writes reach the database, and by tests for determinism.
    pub async fn drain(&self) {
        while self.in_flight() > 0 {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    }
}
