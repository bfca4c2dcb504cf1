use serde::Deserialize;
use std::path::PathBuf;

/// Fully resolved configuration for one crawl run.
///
/// Built from CLI flags layered over an optional TOML config file; see
/// [`super::parser`] for the file format and `main.rs` for the merge.
#[derive(Debug, Clone)]
pub struct CrawlConfig {
    /// Seed URL to start crawling from. Must be absolute HTTP or HTTPS.
    pub seed: String,

    /// Maximum link depth to follow from the seed (seed itself is depth 0).
    pub max_depth: u32,

    /// Number of concurrent fetch workers. Bounds in-flight fetches
    /// globally, not per recursion level.
    pub workers: usize,

    /// File the discovered URL list is written to.
    pub output: PathBuf,

    /// Whether embedded resources (images) are downloaded.
    pub download_resources: bool,

    /// Directory the resource store is created under.
    pub resource_dir: PathBuf,

    /// Per-request timeout in seconds.
    pub fetch_timeout_secs: u64,

    /// User agent sent with every request.
    pub user_agent: String,

    /// Claim-space partition this process owns.
    pub partition: PartitionConfig,
}

/// Hash partition of the URL claim space, for multi-process fan-out.
///
/// Each cooperating process is given a distinct `index` in `0..count` and
/// only claims URLs hashing to its slice, so visited sets stay disjoint
/// without a shared coordination service. The default single partition
/// owns everything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartitionConfig {
    pub index: u32,
    pub count: u32,
}

impl Default for PartitionConfig {
    fn default() -> Self {
        Self { index: 0, count: 1 }
    }
}

impl PartitionConfig {
    /// True when this is the sole partition (single-process run).
    pub fn is_sole(&self) -> bool {
        self.count <= 1
    }
}

/// Raw, partially specified config as read from a TOML file.
///
/// Every field is optional; missing values fall back to CLI flags or
/// built-in defaults during the merge in `main.rs`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub seed: Option<String>,

    #[serde(rename = "max-depth")]
    pub max_depth: Option<u32>,

    pub workers: Option<usize>,

    pub output: Option<PathBuf>,

    #[serde(rename = "download-resources")]
    pub download_resources: Option<bool>,

    #[serde(rename = "resource-dir")]
    pub resource_dir: Option<PathBuf>,

    #[serde(rename = "fetch-timeout-secs")]
    pub fetch_timeout_secs: Option<u64>,

    #[serde(rename = "user-agent")]
    pub user_agent: Option<String>,

    pub partition: Option<FilePartition>,
}

/// Partition table in the config file.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FilePartition {
    pub index: u32,
    pub count: u32,
}
