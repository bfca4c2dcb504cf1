//! One worker visit: fetch a claimed URL, extract and resolve its links,
//! download its resources.
//!
//! Workers hold no shared mutable state of their own; everything they
//! need travels in the [`WorkerContext`], and discovered links flow back
//! to the engine for re-submission rather than spawning nested work.

use std::collections::HashSet;
use std::sync::Arc;

use reqwest::Client;
use url::Url;

use crate::crawler::aggregator::{Aggregator, ResultRecord};
use crate::crawler::fetcher;
use crate::crawler::parser;
use crate::crawler::scheduler::CrawlTask;
use crate::crawler::shutdown::ShutdownCoordinator;
use crate::output::ResourceStore;
use crate::url::resolve_link;

/// Everything a worker needs for one run, injected rather than ambient.
pub struct WorkerContext {
    pub client: Client,
    pub aggregator: Arc<Aggregator>,
    pub shutdown: Arc<ShutdownCoordinator>,
    /// Present only when resource downloading is enabled.
    pub store: Option<Arc<ResourceStore>>,
}

/// What one visit produced, handed back to the engine.
#[derive(Debug)]
pub struct VisitOutcome {
    pub task: CrawlTask,
    /// Absolute links found on the page, to be submitted at depth + 1.
    pub links: Vec<Url>,
}

impl VisitOutcome {
    fn empty(task: CrawlTask) -> Self {
        Self {
            task,
            links: Vec::new(),
        }
    }
}

/// Visits one claimed URL.
///
/// A task that finds the run cancelled returns immediately with no side
/// effects; its URL stays in the result set because the claim-time
/// `Discovered` record was already emitted. Fetch failures are recorded
/// and isolated, never propagated.
pub async fn visit(ctx: Arc<WorkerContext>, task: CrawlTask) -> VisitOutcome {
    if ctx.shutdown.is_cancelled() {
        tracing::debug!("Skipping {} (run cancelled)", task.url);
        return VisitOutcome::empty(task);
    }

    tracing::debug!("Visiting {} at depth {}", task.url, task.depth);

    let page = match fetcher::fetch_page(&ctx.client, task.url.as_str()).await {
        Ok(page) => page,
        Err(e) => {
            tracing::warn!("Failed to fetch {}: {}", task.url, e);
            ctx.aggregator.record(ResultRecord::FetchFailed {
                url: task.url.to_string(),
                reason: e.to_string(),
            });
            return VisitOutcome::empty(task);
        }
    };

    let extracted = parser::extract_page(&page.body);

    let links: Vec<Url> = extracted
        .links
        .iter()
        .filter_map(|href| resolve_link(&task.url, href))
        .collect();

    tracing::debug!(
        "{}: {} link candidates, {} resource candidates",
        task.url,
        links.len(),
        extracted.resources.len()
    );

    if let Some(store) = &ctx.store {
        download_resources(&ctx, store, &task, &extracted.resources).await;
    }

    VisitOutcome { task, links }
}

/// Downloads the resources referenced by one page.
///
/// Resources bypass the frontier and the depth bound; the only dedup is
/// within this visit, so a page repeating the same image fetches it once.
async fn download_resources(
    ctx: &WorkerContext,
    store: &ResourceStore,
    task: &CrawlTask,
    resources: &[String],
) {
    let mut seen: HashSet<String> = HashSet::new();

    for raw in resources {
        let Some(url) = resolve_link(&task.url, raw) else {
            continue;
        };
        if !seen.insert(url.to_string()) {
            continue;
        }

        match store.download(&ctx.client, &url).await {
            Ok(bytes) => {
                tracing::debug!("Downloaded resource {} ({} bytes)", url, bytes);
                ctx.aggregator.record(ResultRecord::ResourceDownloaded {
                    url: url.to_string(),
                    bytes,
                });
            }
            Err(e) => {
                tracing::warn!("Failed to download resource {}: {}", url, e);
                ctx.aggregator.record(ResultRecord::ResourceFailed {
                    url: url.to_string(),
                    reason: e.to_string(),
                });
            }
        }
    }
}
