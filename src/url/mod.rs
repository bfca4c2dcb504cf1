//! URL helpers: seed validation, link resolution, claim-space partitioning.
//!
//! Normalization here is deliberately minimal: relative links are resolved
//! against the page's own URL so equivalent absolute forms collide in the
//! frontier, but no further canonicalization (case, trailing slash, query
//! order) is performed. Known limitation, not a bug.

use crate::CrawlError;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use url::Url;

/// Parses and validates a seed URL.
///
/// The seed must be an absolute HTTP or HTTPS URL with a host; anything
/// else fails fast before any fetch is attempted.
pub fn parse_seed(raw: &str) -> Result<Url, CrawlError> {
    let url = Url::parse(raw).map_err(|e| CrawlError::InvalidSeed {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(CrawlError::InvalidSeed {
            url: raw.to_string(),
            reason: format!("unsupported scheme {}", url.scheme()),
        });
    }

    if url.host_str().is_none() {
        return Err(CrawlError::InvalidSeed {
            url: raw.to_string(),
            reason: "missing host".to_string(),
        });
    }

    Ok(url)
}

/// Resolves an extracted link candidate against the page it was found on.
///
/// Returns `None` for candidates that should never be crawled:
/// - `javascript:`, `mailto:`, `tel:` and `data:` schemes
/// - fragment-only links (same-page anchors)
/// - hrefs that fail to resolve
/// - anything that is not HTTP(S) after resolution
pub fn resolve_link(base: &Url, href: &str) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    if href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("data:")
    {
        return None;
    }

    match base.join(href) {
        Ok(resolved) if resolved.scheme() == "http" || resolved.scheme() == "https" => {
            Some(resolved)
        }
        _ => None,
    }
}

/// Deterministic partition of a URL within a claim space of `count` slices.
///
/// Cooperating processes each own one slice, keeping their visited sets
/// disjoint without shared state. Stable for the lifetime of a run; not
/// guaranteed stable across Rust versions (all processes of one run must
/// be built from the same binary).
pub fn partition_of(url: &str, count: u32) -> u32 {
    if count <= 1 {
        return 0;
    }
    let mut hasher = DefaultHasher::new();
    url.hash(&mut hasher);
    (hasher.finish() % u64::from(count)) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://example.com/dir/page").unwrap()
    }

    #[test]
    fn test_parse_seed_https() {
        assert!(parse_seed("https://example.com/").is_ok());
    }

    #[test]
    fn test_parse_seed_http() {
        assert!(parse_seed("http://example.com/start").is_ok());
    }

    #[test]
    fn test_parse_seed_rejects_relative() {
        assert!(parse_seed("/relative/path").is_err());
    }

    #[test]
    fn test_parse_seed_rejects_ftp() {
        assert!(parse_seed("ftp://example.com/").is_err());
    }

    #[test]
    fn test_resolve_absolute() {
        let resolved = resolve_link(&base(), "https://other.com/page").unwrap();
        assert_eq!(resolved.as_str(), "https://other.com/page");
    }

    #[test]
    fn test_resolve_root_relative() {
        let resolved = resolve_link(&base(), "/about").unwrap();
        assert_eq!(resolved.as_str(), "https://example.com/about");
    }

    #[test]
    fn test_resolve_path_relative() {
        let resolved = resolve_link(&base(), "other").unwrap();
        assert_eq!(resolved.as_str(), "https://example.com/dir/other");
    }

    #[test]
    fn test_skip_fragment_only() {
        assert!(resolve_link(&base(), "#section").is_none());
    }

    #[test]
    fn test_skip_special_schemes() {
        assert!(resolve_link(&base(), "javascript:void(0)").is_none());
        assert!(resolve_link(&base(), "mailto:a@b.com").is_none());
        assert!(resolve_link(&base(), "tel:+123").is_none());
        assert!(resolve_link(&base(), "data:text/plain,hi").is_none());
    }

    #[test]
    fn test_skip_empty() {
        assert!(resolve_link(&base(), "").is_none());
        assert!(resolve_link(&base(), "   ").is_none());
    }

    #[test]
    fn test_partition_single_slice() {
        assert_eq!(partition_of("https://example.com/a", 1), 0);
        assert_eq!(partition_of("https://example.com/b", 0), 0);
    }

    #[test]
    fn test_partition_deterministic() {
        let url = "https://example.com/page";
        assert_eq!(partition_of(url, 4), partition_of(url, 4));
    }

    #[test]
    fn test_partition_in_range() {
        for i in 0..100 {
            let url = format!("https://example.com/page/{}", i);
            assert!(partition_of(&url, 7) < 7);
        }
    }
}
