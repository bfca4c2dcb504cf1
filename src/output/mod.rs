//! Crawl output: the discovered URL list, the resource store, and the
//! end-of-run summary.

use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::crawler::{fetch_resource, FetchError, ResultRecord};
use crate::{CrawlError, Result};

/// Writes the discovery-ordered, newline-delimited URL list.
///
/// Only `Discovered` records appear here; the frontier guarantees the
/// list is already distinct.
pub fn write_url_list(records: &[ResultRecord], path: &Path) -> Result<()> {
    let mut file = std::fs::File::create(path)?;
    for record in records {
        if let ResultRecord::Discovered { url, .. } = record {
            writeln!(file, "{}", url)?;
        }
    }
    Ok(())
}

/// On-disk store for downloaded resources.
///
/// Files land under `<base>/partition_<index>/` keyed by the resource
/// URL's basename. Basename collisions are last-write-wins; documented
/// limitation.
#[derive(Debug)]
pub struct ResourceStore {
    root: PathBuf,
}

impl ResourceStore {
    /// Creates the store directory. Failure here is fatal to the run
    /// (resource exhaustion before any work starts).
    pub fn create(base: &Path, partition: u32) -> Result<Self> {
        let root = base.join(format!("partition_{}", partition));
        std::fs::create_dir_all(&root).map_err(|source| CrawlError::StoreUnavailable {
            path: root.display().to_string(),
            source,
        })?;
        Ok(Self { root })
    }

    /// Destination path for a resource URL.
    fn dest_for(&self, url: &url::Url) -> PathBuf {
        let name = url
            .path_segments()
            .and_then(|mut segments| segments.next_back())
            .filter(|segment| !segment.is_empty())
            .unwrap_or("resource");
        self.root.join(name)
    }

    /// Streams the resource at `url` into the store, returning the byte
    /// count.
    pub async fn download(
        &self,
        client: &reqwest::Client,
        url: &url::Url,
    ) -> std::result::Result<u64, FetchError> {
        fetch_resource(client, url.as_str(), &self.dest_for(url)).await
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

/// Tallied counts for one run, printed when the crawl ends.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub discovered: usize,
    pub fetch_failures: usize,
    pub resources_downloaded: usize,
    pub resource_failures: usize,
    pub resource_bytes: u64,
}

/// Tallies a record snapshot into a [`RunSummary`].
pub fn summarize(records: &[ResultRecord]) -> RunSummary {
    let mut summary = RunSummary::default();
    for record in records {
        match record {
            ResultRecord::Discovered { .. } => summary.discovered += 1,
            ResultRecord::FetchFailed { .. } => summary.fetch_failures += 1,
            ResultRecord::ResourceDownloaded { bytes, .. } => {
                summary.resources_downloaded += 1;
                summary.resource_bytes += bytes;
            }
            ResultRecord::ResourceFailed { .. } => summary.resource_failures += 1,
        }
    }
    summary
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} URLs discovered, {} fetch failures",
            self.discovered, self.fetch_failures
        )?;
        if self.resources_downloaded > 0 || self.resource_failures > 0 {
            write!(
                f,
                ", {} resources downloaded ({} bytes), {} resource failures",
                self.resources_downloaded, self.resource_bytes, self.resource_failures
            )?;
        }
        Ok(())
    }
}
