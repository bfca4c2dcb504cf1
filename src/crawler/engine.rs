//! Crawl engine: orchestrates one run end to end.
//!
//! The engine seeds the scheduler, keeps the worker pool topped up from
//! the pending queue, reaps finished visits, and feeds their discovered
//! links back through the scheduler's admission control. Recursion is
//! re-enqueueing, never nested pool creation, so a run completes with a
//! plain fan-out/fan-in join: pending queue empty and nothing in flight.

use std::sync::Arc;
use std::time::Instant;

use tokio::task::JoinSet;

use crate::config::CrawlConfig;
use crate::crawler::aggregator::{Aggregator, ResultRecord};
use crate::crawler::fetcher::build_http_client;
use crate::crawler::frontier::Frontier;
use crate::crawler::scheduler::{Scheduler, SubmitOutcome};
use crate::crawler::shutdown::{RunPhase, ShutdownCoordinator};
use crate::crawler::worker::{self, VisitOutcome, WorkerContext};
use crate::output::ResourceStore;
use crate::url::parse_seed;
use crate::{ConfigError, Result};

/// Final outcome of one crawl run.
#[derive(Debug)]
pub struct CrawlReport {
    /// Every record submitted before the run drained, in submission order.
    pub records: Vec<ResultRecord>,
    /// Whether the run ended by cancellation rather than completion.
    pub cancelled: bool,
}

impl CrawlReport {
    /// Discovery-ordered list of distinct discovered URLs.
    pub fn discovered(&self) -> Vec<&str> {
        self.records
            .iter()
            .filter_map(|r| match r {
                ResultRecord::Discovered { url, .. } => Some(url.as_str()),
                _ => None,
            })
            .collect()
    }
}

/// Drives one crawl run.
pub struct CrawlEngine {
    config: Arc<CrawlConfig>,
    scheduler: Scheduler,
    aggregator: Arc<Aggregator>,
    shutdown: Arc<ShutdownCoordinator>,
    ctx: Arc<WorkerContext>,
}

impl CrawlEngine {
    /// Validates the config and assembles the run state: frontier,
    /// aggregator, worker pool, HTTP client, and (if enabled) the
    /// resource store. Store creation failure is fatal.
    pub fn new(config: CrawlConfig, shutdown: Arc<ShutdownCoordinator>) -> Result<Self> {
        crate::config::validate(&config)?;

        let frontier = Arc::new(if config.partition.is_sole() {
            Frontier::new()
        } else {
            Frontier::partitioned(config.partition.index, config.partition.count)
        });

        let aggregator = Arc::new(Aggregator::new());
        let scheduler = Scheduler::new(
            config.max_depth,
            config.workers,
            Arc::clone(&frontier),
            Arc::clone(&aggregator),
            Arc::clone(&shutdown),
        );

        let client = build_http_client(&config.user_agent, config.fetch_timeout_secs)?;

        let store = if config.download_resources {
            Some(Arc::new(ResourceStore::create(
                &config.resource_dir,
                config.partition.index,
            )?))
        } else {
            None
        };

        let ctx = Arc::new(WorkerContext {
            client,
            aggregator: Arc::clone(&aggregator),
            shutdown: Arc::clone(&shutdown),
            store,
        });

        Ok(Self {
            config: Arc::new(config),
            scheduler,
            aggregator,
            shutdown,
            ctx,
        })
    }

    /// Runs the crawl to completion or cancellation and returns the
    /// report. The run is drained (no in-flight work) when this returns.
    pub async fn run(&mut self) -> Result<CrawlReport> {
        let seed = parse_seed(&self.config.seed)?;
        tracing::info!(
            "Starting crawl: seed={}, max_depth={}, workers={}",
            seed,
            self.config.max_depth,
            self.config.workers
        );

        match self.scheduler.submit(seed.clone(), 0, None) {
            SubmitOutcome::Queued => {}
            SubmitOutcome::NotOwned => {
                tracing::info!("Seed {} belongs to another partition; nothing to do here", seed);
            }
            outcome => {
                // Claimed/cancelled/over-depth seeds cannot happen on a
                // fresh run state.
                return Err(ConfigError::Validation(format!(
                    "seed rejected by scheduler: {:?}",
                    outcome
                ))
                .into());
            }
        }

        let mut in_flight: JoinSet<VisitOutcome> = JoinSet::new();
        let started = Instant::now();
        let mut pages_visited = 0usize;

        loop {
            if self.shutdown.phase() == RunPhase::ShuttingDown {
                tracing::info!(
                    "Shutdown requested; letting {} in-flight fetch(es) finish",
                    in_flight.len()
                );
                break;
            }

            // Top up the worker pool from the pending queue.
            while let Some((task, permit)) = self.scheduler.dispatch() {
                let ctx = Arc::clone(&self.ctx);
                in_flight.spawn(async move {
                    let outcome = worker::visit(ctx, task).await;
                    drop(permit);
                    outcome
                });
            }

            if in_flight.is_empty() && !self.scheduler.has_pending() {
                tracing::info!("Frontier exhausted, crawl complete");
                break;
            }

            match in_flight.join_next().await {
                Some(Ok(outcome)) => {
                    pages_visited += 1;
                    self.absorb(outcome);

                    if pages_visited % 10 == 0 {
                        let rate = pages_visited as f64 / started.elapsed().as_secs_f64();
                        tracing::info!(
                            "Progress: {} pages visited, {} pending, {:.2} pages/sec",
                            pages_visited,
                            self.scheduler.pending_len(),
                            rate
                        );
                    }
                }
                Some(Err(e)) => {
                    tracing::error!("Worker task failed to join: {}", e);
                }
                None => {}
            }
        }

        // Drain: in-flight fetches run to completion (bounded by the
        // fetch timeout); their link submissions are refused once the run
        // is cancelled, but their failure records still land.
        while let Some(joined) = in_flight.join_next().await {
            match joined {
                Ok(outcome) => {
                    pages_visited += 1;
                    self.absorb(outcome);
                }
                Err(e) => tracing::error!("Worker task failed to join: {}", e),
            }
        }

        let cancelled = self.shutdown.is_cancelled();
        self.shutdown.mark_drained();

        tracing::info!(
            "Crawl {}: {} pages visited, {} URLs discovered in {:?}",
            if cancelled { "cancelled" } else { "finished" },
            pages_visited,
            self.aggregator.discovered_count(),
            started.elapsed()
        );

        Ok(CrawlReport {
            records: self.aggregator.snapshot(),
            cancelled,
        })
    }

    /// Feeds one visit's discovered links back through admission control.
    fn absorb(&mut self, outcome: VisitOutcome) {
        let depth = outcome.task.depth + 1;
        for link in outcome.links {
            match self
                .scheduler
                .submit(link.clone(), depth, Some(outcome.task.url.clone()))
            {
                SubmitOutcome::Queued => {}
                SubmitOutcome::DepthExceeded => {
                    tracing::trace!("Dropping {} (depth {} beyond bound)", link, depth);
                }
                SubmitOutcome::AlreadyClaimed => {
                    tracing::trace!("Dropping {} (already claimed)", link);
                }
                SubmitOutcome::NotOwned => {
                    tracing::trace!("Dropping {} (other partition)", link);
                }
                SubmitOutcome::Cancelled => {
                    tracing::trace!("Dropping {} (run cancelled)", link);
                }
            }
        }
    }
}

/// Runs a complete crawl with the given config and shutdown coordinator.
///
/// This is the main library entry point; `main.rs` wires the coordinator
/// to process signals before calling it.
pub async fn crawl(
    config: CrawlConfig,
    shutdown: Arc<ShutdownCoordinator>,
) -> Result<CrawlReport> {
    let mut engine = CrawlEngine::new(config, shutdown)?;
    engine.run().await
}
