//! Driftnet command-line entry point.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use driftnet::config::{load_file_config, validate, CrawlConfig, FileConfig, PartitionConfig};
use driftnet::crawler::{crawl, ShutdownCoordinator};
use driftnet::output::{summarize, write_url_list};
use tracing_subscriber::EnvFilter;

/// Driftnet: a depth-bounded concurrent web crawler
///
/// Crawls outward from a seed URL up to a maximum link depth, writes the
/// deduplicated list of discovered URLs, and can download embedded
/// resources along the way.
#[derive(Parser, Debug)]
#[command(name = "driftnet")]
#[command(version)]
#[command(about = "A depth-bounded concurrent web crawler", long_about = None)]
struct Cli {
    /// Seed URL to crawl from (absolute http:// or https://)
    #[arg(long)]
    url: Option<String>,

    /// Maximum link depth to follow from the seed
    #[arg(long)]
    max_depth: Option<u32>,

    /// Number of concurrent fetch workers
    #[arg(long)]
    workers: Option<usize>,

    /// File to write the discovered URL list to
    #[arg(long)]
    output: Option<PathBuf>,

    /// Also download embedded resources (images) to the resource store
    #[arg(long)]
    download_resources: bool,

    /// Directory to create the resource store under
    #[arg(long)]
    resource_dir: Option<PathBuf>,

    /// Claim-space partition index owned by this process
    #[arg(long, requires = "partition_count")]
    partition_index: Option<u32>,

    /// Total number of cooperating claim-space partitions
    #[arg(long)]
    partition_count: Option<u32>,

    /// TOML config file supplying defaults for the flags above
    #[arg(long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let file = match &cli.config {
        Some(path) => {
            tracing::info!("Loading config defaults from: {}", path.display());
            load_file_config(path)?
        }
        None => FileConfig::default(),
    };

    let config = build_config(&cli, file);
    validate(&config)?;

    let shutdown = Arc::new(ShutdownCoordinator::new());
    spawn_signal_listener(Arc::clone(&shutdown));

    let report = crawl(config.clone(), shutdown).await?;

    write_url_list(&report.records, &config.output)?;
    tracing::info!("URL list written to {}", config.output.display());

    let summary = summarize(&report.records);
    if report.cancelled {
        println!("Crawl cancelled; partial results: {}", summary);
    } else {
        println!("Crawl complete: {}", summary);
    }

    Ok(())
}

/// Layers CLI flags over config-file values over built-in defaults.
fn build_config(cli: &Cli, file: FileConfig) -> CrawlConfig {
    let partition = match (
        cli.partition_index,
        cli.partition_count,
        file.partition,
    ) {
        (Some(index), Some(count), _) => PartitionConfig { index, count },
        (None, _, Some(p)) => PartitionConfig {
            index: p.index,
            count: p.count,
        },
        _ => PartitionConfig::default(),
    };

    CrawlConfig {
        seed: cli.url.clone().or(file.seed).unwrap_or_default(),
        max_depth: cli.max_depth.or(file.max_depth).unwrap_or(1),
        workers: cli.workers.or(file.workers).unwrap_or(4),
        output: cli
            .output
            .clone()
            .or(file.output)
            .unwrap_or_else(|| PathBuf::from("found_urls.txt")),
        download_resources: cli.download_resources || file.download_resources.unwrap_or(false),
        resource_dir: cli
            .resource_dir
            .clone()
            .or(file.resource_dir)
            .unwrap_or_else(|| PathBuf::from("resources")),
        fetch_timeout_secs: file.fetch_timeout_secs.unwrap_or(30),
        user_agent: file
            .user_agent
            .unwrap_or_else(|| format!("driftnet/{}", env!("CARGO_PKG_VERSION"))),
        partition,
    }
}

/// Sets up the tracing subscriber based on verbosity level.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("driftnet=info,warn"),
            1 => EnvFilter::new("driftnet=debug,info"),
            2 => EnvFilter::new("driftnet=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Wires SIGINT/SIGTERM to cooperative shutdown.
///
/// The first signal starts a graceful drain; the process exits once all
/// in-flight fetches finish (bounded by the fetch timeout).
fn spawn_signal_listener(shutdown: Arc<ShutdownCoordinator>) {
    tokio::spawn(async move {
        wait_for_interrupt().await;
        tracing::info!("Interrupt received, shutting down gracefully...");
        shutdown.begin_shutdown();
    });
}

#[cfg(unix)]
async fn wait_for_interrupt() {
    use tokio::signal::unix::{signal, SignalKind};

    let mut term = match signal(SignalKind::terminate()) {
        Ok(term) => term,
        Err(e) => {
            tracing::error!("Failed to install SIGTERM handler: {}", e);
            let _ = tokio::signal::ctrl_c().await;
            return;
        }
    };

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {}
        _ = term.recv() => {}
    }
}

#[cfg(not(unix))]
async fn wait_for_interrupt() {
    let _ = tokio::signal::ctrl_c().await;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bare_cli() -> Cli {
        Cli::parse_from(["driftnet"])
    }

    #[test]
    fn test_defaults_without_file() {
        let config = build_config(&bare_cli(), FileConfig::default());
        assert_eq!(config.max_depth, 1);
        assert_eq!(config.workers, 4);
        assert_eq!(config.output, PathBuf::from("found_urls.txt"));
        assert!(!config.download_resources);
        assert_eq!(config.partition, PartitionConfig::default());
    }

    #[test]
    fn test_cli_overrides_file() {
        let cli = Cli::parse_from([
            "driftnet",
            "--url",
            "https://cli.example.com/",
            "--max-depth",
            "3",
        ]);
        let file = FileConfig {
            seed: Some("https://file.example.com/".to_string()),
            max_depth: Some(9),
            workers: Some(8),
            ..FileConfig::default()
        };

        let config = build_config(&cli, file);
        assert_eq!(config.seed, "https://cli.example.com/");
        assert_eq!(config.max_depth, 3);
        // Not set on the CLI, so the file value wins.
        assert_eq!(config.workers, 8);
    }

    #[test]
    fn test_partition_flags_override_file() {
        let cli = Cli::parse_from([
            "driftnet",
            "--partition-index",
            "1",
            "--partition-count",
            "4",
        ]);
        let file = FileConfig {
            partition: Some(driftnet::config::FilePartition { index: 0, count: 2 }),
            ..FileConfig::default()
        };

        let config = build_config(&cli, file);
        assert_eq!(config.partition, PartitionConfig { index: 1, count: 4 });
    }
}
