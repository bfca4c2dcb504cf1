//! The concurrent crawl engine.
//!
//! Module map:
//! - `frontier`: at-most-once URL claims shared by all workers
//! - `scheduler`: depth admission and semaphore-bounded dispatch
//! - `worker`: one visit (fetch, extract, resolve, download)
//! - `engine`: the fan-out/fan-in run loop
//! - `aggregator`: concurrent result collection
//! - `shutdown`: the Running -> ShuttingDown -> Drained machine
//! - `fetcher` / `parser`: the HTTP and HTML collaborators

mod aggregator;
mod engine;
mod fetcher;
mod frontier;
mod parser;
mod scheduler;
mod shutdown;
mod worker;

pub use aggregator::{Aggregator, ResultRecord};
pub use engine::{crawl, CrawlEngine, CrawlReport};
pub use fetcher::{build_http_client, fetch_page, fetch_resource, FetchError, Page};
pub use frontier::Frontier;
pub use parser::{extract_page, ExtractedPage};
pub use scheduler::{CrawlTask, Scheduler, SubmitOutcome};
pub use shutdown::{RunPhase, ShutdownCoordinator};
pub use worker::{visit, VisitOutcome, WorkerContext};
