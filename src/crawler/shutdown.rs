//! Cooperative shutdown coordination.
//!
//! A run moves through `Running -> ShuttingDown -> Drained`. Cancellation
//! is cooperative: it is checked at dispatch time and at the start of each
//! worker's visit, while in-flight fetches are allowed to finish (bounded
//! by the fetch timeout) so no half-written records or files are left
//! behind.

use std::sync::atomic::{AtomicU8, Ordering};

/// Lifecycle phase of a crawl run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    /// Tasks are being dispatched and fetched.
    Running,
    /// Cancellation requested; no new dispatches, in-flight work draining.
    ShuttingDown,
    /// All workers have returned; the run is over.
    Drained,
}

const RUNNING: u8 = 0;
const SHUTTING_DOWN: u8 = 1;
const DRAINED: u8 = 2;

/// Owns the cancellation flag for one run and enforces the phase order.
#[derive(Debug)]
pub struct ShutdownCoordinator {
    phase: AtomicU8,
}

impl ShutdownCoordinator {
    pub fn new() -> Self {
        Self {
            phase: AtomicU8::new(RUNNING),
        }
    }

    pub fn phase(&self) -> RunPhase {
        match self.phase.load(Ordering::Acquire) {
            RUNNING => RunPhase::Running,
            SHUTTING_DOWN => RunPhase::ShuttingDown,
            _ => RunPhase::Drained,
        }
    }

    /// Requests cancellation. Returns true if this call performed the
    /// `Running -> ShuttingDown` transition, false if the run was already
    /// past `Running`.
    pub fn begin_shutdown(&self) -> bool {
        self.phase
            .compare_exchange(RUNNING, SHUTTING_DOWN, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// True once cancellation has been requested (or the run has drained).
    pub fn is_cancelled(&self) -> bool {
        self.phase.load(Ordering::Acquire) != RUNNING
    }

    /// Marks the run drained. Called by the engine once every in-flight
    /// worker has returned; a naturally completed run moves straight from
    /// `Running` to `Drained`.
    pub fn mark_drained(&self) {
        self.phase.store(DRAINED, Ordering::Release);
    }
}

impl Default for ShutdownCoordinator {
    fn default() -> Self {
        Self::new()
    }
}
