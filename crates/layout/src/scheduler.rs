//! Per-container background pass worker.
//!
//! Each scheduled container owns one worker task. Requests are handled
//! strictly one at a time, so passes of the same container never interleave.
//! A request that has been superseded by a newer one before the worker picks
//! it up is dropped, and a completed pass whose generation is no longer the
//! newest is discarded when the owner collects results.

use crate::engine::{LayoutPass, PassRequest};
use common::error::{LayoutError, LayoutResult};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Handle to a container's pass worker.
#[derive(Debug)]
pub struct PassScheduler {
    requests: mpsc::UnboundedSender<PassRequest>,
    completed: mpsc::UnboundedReceiver<LayoutPass>,
    latest: Arc<AtomicU64>,
    task: JoinHandle<()>,
}

impl PassScheduler {
    /// Start a worker on `handle`.
    pub fn spawn(handle: &Handle) -> Self {
        let (request_tx, request_rx) = mpsc::unbounded_channel();
        let (completed_tx, completed_rx) = mpsc::unbounded_channel();
        let latest = Arc::new(AtomicU64::new(0));

        let task = handle.spawn(run_worker(request_rx, completed_tx, latest.clone()));

        Self {
            requests: request_tx,
            completed: completed_rx,
            latest,
            task,
        }
    }

    /// Generation of the most recently submitted request.
    pub fn latest_generation(&self) -> u64 {
        self.latest.load(Ordering::Acquire)
    }

    /// Queue a prepared pass. Marks every older pass as superseded.
    pub fn submit(&self, request: PassRequest) -> LayoutResult<()> {
        let generation = request.generation();
        self.latest.fetch_max(generation, Ordering::AcqRel);
        self.requests
            .send(request)
            .map_err(|_| LayoutError::SchedulerClosed)
    }

    /// Newest completed pass, if one is ready. Never blocks.
    pub fn try_next(&mut self) -> Option<LayoutPass> {
        let mut newest = None;
        while let Ok(pass) = self.completed.try_recv() {
            if self.is_current(&pass) {
                newest = Some(pass);
            }
        }
        newest
    }

    /// Wait for the pass matching the latest submitted request.
    ///
    /// Only call this with a request outstanding; otherwise it waits until
    /// the next one completes.
    pub async fn next(&mut self) -> LayoutResult<LayoutPass> {
        loop {
            let pass = self
                .completed
                .recv()
                .await
                .ok_or(LayoutError::SchedulerClosed)?;
            if self.is_current(&pass) {
                return Ok(pass);
            }
        }
    }

    fn is_current(&self, pass: &LayoutPass) -> bool {
        let latest = self.latest_generation();
        if pass.generation < latest {
            tracing::debug!(generation = pass.generation, latest, "discarding stale layout pass");
            return false;
        }
        true
    }
}

impl Drop for PassScheduler {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn run_worker(
    mut requests: mpsc::UnboundedReceiver<PassRequest>,
    completed: mpsc::UnboundedSender<LayoutPass>,
    latest: Arc<AtomicU64>,
) {
    while let Some(mut request) = requests.recv().await {
        let mut skipped = 0usize;
        while let Ok(newer) = requests.try_recv() {
            request = newer;
            skipped += 1;
        }
        if skipped > 0 {
            tracing::debug!(skipped, generation = request.generation(), "coalesced superseded layout passes");
        }

        // A newer request may have been queued since the drain above.
        if request.generation() < latest.load(Ordering::Acquire) {
            continue;
        }

        let pass = request.compute();
        if completed.send(pass).is_err() {
            break;
        }
    }
    tracing::trace!("layout worker stopped");
}
