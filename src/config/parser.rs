//! Config file loading.
//!
//! The config file is optional and only supplies defaults for the CLI
//! flags; see [`super::types::FileConfig`] for the accepted keys.

use crate::config::FileConfig;
use crate::ConfigResult;
use std::path::Path;

/// Loads and parses a TOML config file.
///
/// # Example file
///
/// ```toml
/// seed = "https://example.com/"
/// max-depth = 2
/// workers = 4
/// output = "found_urls.txt"
/// download-resources = true
/// resource-dir = "resources"
///
/// [partition]
/// index = 0
/// count = 1
/// ```
pub fn load_file_config(path: &Path) -> ConfigResult<FileConfig> {
    let contents = std::fs::read_to_string(path)?;
    let config: FileConfig = toml::from_str(&contents)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("create temp config");
        file.write_all(contents.as_bytes()).expect("write config");
        file
    }

    #[test]
    fn test_load_full_config() {
        let file = write_config(
            r#"
            seed = "https://example.com/"
            max-depth = 3
            workers = 8
            output = "urls.txt"
            download-resources = true
            resource-dir = "imgs"
            fetch-timeout-secs = 15
            user-agent = "test/1.0"

            [partition]
            index = 1
            count = 4
            "#,
        );

        let config = load_file_config(file.path()).unwrap();
        assert_eq!(config.seed.as_deref(), Some("https://example.com/"));
        assert_eq!(config.max_depth, Some(3));
        assert_eq!(config.workers, Some(8));
        assert_eq!(config.download_resources, Some(true));
        assert_eq!(config.fetch_timeout_secs, Some(15));
        let partition = config.partition.unwrap();
        assert_eq!(partition.index, 1);
        assert_eq!(partition.count, 4);
    }

    #[test]
    fn test_load_partial_config() {
        let file = write_config(r#"max-depth = 1"#);

        let config = load_file_config(file.path()).unwrap();
        assert_eq!(config.max_depth, Some(1));
        assert!(config.seed.is_none());
        assert!(config.partition.is_none());
    }

    #[test]
    fn test_unknown_key_rejected() {
        let file = write_config(r#"max_depth = 1"#);
        assert!(load_file_config(file.path()).is_err());
    }

    #[test]
    fn test_missing_file() {
        let result = load_file_config(Path::new("/nonexistent/driftnet.toml"));
        assert!(result.is_err());
    }
}
