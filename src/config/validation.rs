//! Config validation.
//!
//! Validation failures are fatal and abort the run before any fetch
//! starts, as opposed to the per-URL failures recorded during the crawl.

use crate::config::CrawlConfig;
use crate::{ConfigError, ConfigResult};
use url::Url;

/// Validates a resolved [`CrawlConfig`].
///
/// Checks, in order:
/// 1. The seed is present, parses as an absolute URL, uses HTTP or HTTPS,
///    and has a host.
/// 2. The worker pool has at least one worker.
/// 3. The partition table is coherent (`count >= 1`, `index < count`).
/// 4. The fetch timeout is non-zero.
pub fn validate(config: &CrawlConfig) -> ConfigResult<()> {
    if config.seed.is_empty() {
        return Err(ConfigError::Validation(
            "a seed URL is required (--url or config file)".to_string(),
        ));
    }

    let seed = Url::parse(&config.seed)
        .map_err(|e| ConfigError::InvalidUrl(format!("{}: {}", config.seed, e)))?;

    if seed.scheme() != "http" && seed.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "{}: seed must use http or https, got {}",
            config.seed,
            seed.scheme()
        )));
    }

    if seed.host_str().is_none() {
        return Err(ConfigError::InvalidUrl(format!(
            "{}: seed has no host",
            config.seed
        )));
    }

    if config.workers == 0 {
        return Err(ConfigError::Validation(
            "worker pool size must be at least 1".to_string(),
        ));
    }

    if config.partition.count == 0 {
        return Err(ConfigError::Validation(
            "partition count must be at least 1".to_string(),
        ));
    }

    if config.partition.index >= config.partition.count {
        return Err(ConfigError::Validation(format!(
            "partition index {} out of range for {} partitions",
            config.partition.index, config.partition.count
        )));
    }

    if config.fetch_timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "fetch timeout must be at least 1 second".to_string(),
        ));
    }

    Ok(())
}
