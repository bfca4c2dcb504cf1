//! Depth-bounded scheduling: admission control and bounded dispatch.
//!
//! Every discovered (url, depth) pair passes through [`Scheduler::submit`],
//! which enforces the depth bound and the frontier's at-most-once claim
//! before anything is queued. Dispatch hands out tasks together with an
//! owned semaphore permit, bounding in-flight fetches globally per run.

use crate::crawler::aggregator::{Aggregator, ResultRecord};
use crate::crawler::frontier::Frontier;
use crate::crawler::shutdown::ShutdownCoordinator;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use url::Url;

/// A claimed URL waiting for (or undergoing) a fetch.
#[derive(Debug, Clone)]
pub struct CrawlTask {
    pub url: Url,
    /// Link-hops from the seed.
    pub depth: u32,
    /// Page this URL was discovered on; `None` for the seed.
    pub source: Option<Url>,
}

/// Why a submission was or was not admitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Claimed, recorded as discovered, and queued for fetching.
    Queued,
    /// Deeper than the depth bound; dropped without claiming.
    DepthExceeded,
    /// Another path or worker already claimed this URL.
    AlreadyClaimed,
    /// Belongs to another process's claim-space partition.
    NotOwned,
    /// The run is shutting down; nothing new is admitted.
    Cancelled,
}

pub struct Scheduler {
    max_depth: u32,
    pending: VecDeque<CrawlTask>,
    permits: Arc<Semaphore>,
    frontier: Arc<Frontier>,
    aggregator: Arc<Aggregator>,
    shutdown: Arc<ShutdownCoordinator>,
}

impl Scheduler {
    pub fn new(
        max_depth: u32,
        workers: usize,
        frontier: Arc<Frontier>,
        aggregator: Arc<Aggregator>,
        shutdown: Arc<ShutdownCoordinator>,
    ) -> Self {
        Self {
            max_depth,
            pending: VecDeque::new(),
            permits: Arc::new(Semaphore::new(workers)),
            frontier,
            aggregator,
            shutdown,
        }
    }

    /// Admits or drops one discovered (url, depth) pair.
    ///
    /// On `Queued` the URL has been claimed and its `Discovered` record
    /// emitted, so the final result set reflects every claimed URL exactly
    /// once even if the queued task is later cancelled before fetching.
    pub fn submit(&mut self, url: Url, depth: u32, source: Option<Url>) -> SubmitOutcome {
        if self.shutdown.is_cancelled() {
            return SubmitOutcome::Cancelled;
        }

        if depth > self.max_depth {
            return SubmitOutcome::DepthExceeded;
        }

        if !self.frontier.owns(url.as_str()) {
            return SubmitOutcome::NotOwned;
        }

        if !self.frontier.try_claim(url.as_str()) {
            return SubmitOutcome::AlreadyClaimed;
        }

        self.aggregator.record(ResultRecord::Discovered {
            url: url.to_string(),
            depth,
            source: source.as_ref().map(|s| s.to_string()),
        });

        self.pending.push_back(CrawlTask { url, depth, source });
        SubmitOutcome::Queued
    }

    /// Takes the next pending task if a worker slot is free.
    ///
    /// Returns `None` when the queue is empty, all permits are in use, or
    /// the run is shutting down. The permit travels with the task and is
    /// released when the worker finishes.
    pub fn dispatch(&mut self) -> Option<(CrawlTask, OwnedSemaphorePermit)> {
        if self.shutdown.is_cancelled() || self.pending.is_empty() {
            return None;
        }
        let permit = Arc::clone(&self.permits).try_acquire_owned().ok()?;
        let task = self.pending.pop_front()?;
        Some((task, permit))
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_scheduler(max_depth: u32, workers: usize) -> Scheduler {
        Scheduler::new(
            max_depth,
            workers,
            Arc::new(Frontier::new()),
            Arc::new(Aggregator::new()),
            Arc::new(ShutdownCoordinator::new()),
        )
    }

    fn url(path: &str) -> Url {
        Url::parse(&format!("https://example.com{}", path)).unwrap()
    }

    #[test]
    fn test_submit_within_depth_queues() {
        let mut scheduler = test_scheduler(2, 4);
        assert_eq!(scheduler.submit(url("/"), 0, None), SubmitOutcome::Queued);
        assert_eq!(scheduler.submit(url("/a"), 2, None), SubmitOutcome::Queued);
        assert_eq!(scheduler.pending_len(), 2);
    }

    #[test]
    fn test_submit_beyond_depth_dropped_without_claim() {
        let mut scheduler = test_scheduler(1, 4);
        assert_eq!(
            scheduler.submit(url("/deep"), 2, None),
            SubmitOutcome::DepthExceeded
        );
        // The URL was never claimed, so it could be admitted via a
        // shallower path later.
        assert_eq!(
            scheduler.submit(url("/deep"), 1, None),
            SubmitOutcome::Queued
        );
    }

    #[test]
    fn test_duplicate_submission_dropped() {
        let mut scheduler = test_scheduler(3, 4);
        assert_eq!(scheduler.submit(url("/p"), 1, None), SubmitOutcome::Queued);
        assert_eq!(
            scheduler.submit(url("/p"), 2, None),
            SubmitOutcome::AlreadyClaimed
        );
        assert_eq!(scheduler.pending_len(), 1);
    }

    #[test]
    fn test_submit_records_discovery() {
        let aggregator = Arc::new(Aggregator::new());
        let mut scheduler = Scheduler::new(
            2,
            4,
            Arc::new(Frontier::new()),
            Arc::clone(&aggregator),
            Arc::new(ShutdownCoordinator::new()),
        );

        scheduler.submit(url("/found"), 1, Some(url("/")));
        let snapshot = aggregator.snapshot();
        assert_eq!(snapshot.len(), 1);
        match &snapshot[0] {
            ResultRecord::Discovered { url: u, depth, source } => {
                assert_eq!(u, "https://example.com/found");
                assert_eq!(*depth, 1);
                assert_eq!(source.as_deref(), Some("https://example.com/"));
            }
            other => panic!("expected Discovered, got {:?}", other),
        }
    }

    #[test]
    fn test_cancelled_submission_not_claimed() {
        let shutdown = Arc::new(ShutdownCoordinator::new());
        let frontier = Arc::new(Frontier::new());
        let mut scheduler = Scheduler::new(
            2,
            4,
            Arc::clone(&frontier),
            Arc::new(Aggregator::new()),
            Arc::clone(&shutdown),
        );

        shutdown.begin_shutdown();
        assert_eq!(
            scheduler.submit(url("/late"), 0, None),
            SubmitOutcome::Cancelled
        );
        assert_eq!(frontier.claimed_count(), 0);
    }

    #[test]
    fn test_dispatch_bounded_by_worker_pool() {
        let mut scheduler = test_scheduler(2, 2);
        for i in 0..4 {
            scheduler.submit(url(&format!("/{}", i)), 0, None);
        }

        let first = scheduler.dispatch().expect("first slot");
        let second = scheduler.dispatch().expect("second slot");
        assert!(scheduler.dispatch().is_none(), "pool of 2 is saturated");

        drop(first.1);
        let third = scheduler.dispatch().expect("slot freed");
        drop(second.1);
        drop(third.1);
    }

    #[test]
    fn test_dispatch_stops_on_shutdown() {
        let shutdown = Arc::new(ShutdownCoordinator::new());
        let mut scheduler = Scheduler::new(
            2,
            4,
            Arc::new(Frontier::new()),
            Arc::new(Aggregator::new()),
            Arc::clone(&shutdown),
        );
        scheduler.submit(url("/queued"), 0, None);

        shutdown.begin_shutdown();
        assert!(scheduler.dispatch().is_none());
        // Still pending, but it will never be fetched.
        assert!(scheduler.has_pending());
    }
}
