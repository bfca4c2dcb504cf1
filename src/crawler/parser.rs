//! Link and resource extraction from HTML.
//!
//! Produces raw candidate strings only: anchor hrefs, image srcs, and
//! URLs spotted in the page's rendered text. Resolution against the page
//! URL and deduplication happen downstream in the worker and frontier.

use regex::Regex;
use scraper::{Html, Selector};
use std::sync::LazyLock;

/// Permissive match for URLs embedded in plain text. Intentionally loose:
/// it can pick up trailing punctuation and misses URLs split by markup.
static TEXT_URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https?://\S+").expect("hardcoded regex pattern is valid"));

/// Punctuation commonly glued onto the end of a URL in prose.
const TRAILING_PUNCTUATION: &[char] = &['.', ',', ';', ':', '!', '?', ')', '"', '\'', '>'];

/// Candidate strings extracted from one page.
#[derive(Debug, Clone, Default)]
pub struct ExtractedPage {
    /// Anchor hrefs plus plain-text URLs, unresolved and undeduplicated.
    pub links: Vec<String>,

    /// Resource references (image srcs), unresolved.
    pub resources: Vec<String>,
}

/// Extracts link and resource candidates from HTML.
///
/// Malformed markup never fails: the HTML parser is lenient, and a page
/// that yields nothing simply produces an empty candidate set.
pub fn extract_page(html: &str) -> ExtractedPage {
    let document = Html::parse_document(html);

    let mut links = Vec::new();

    if let Ok(selector) = Selector::parse("a[href]") {
        for element in document.select(&selector) {
            if let Some(href) = element.value().attr("href") {
                links.push(href.to_string());
            }
        }
    }

    // Plain-text URLs from the rendered text, the way a reader would see
    // them. Best-effort heuristic; see the trailing-punctuation trim.
    let text: String = document.root_element().text().collect();
    for found in TEXT_URL_RE.find_iter(&text) {
        let candidate = found.as_str().trim_end_matches(TRAILING_PUNCTUATION);
        if !candidate.is_empty() {
            links.push(candidate.to_string());
        }
    }

    let mut resources = Vec::new();
    if let Ok(selector) = Selector::parse("img[src]") {
        for element in document.select(&selector) {
            if let Some(src) = element.value().attr("src") {
                resources.push(src.to_string());
            }
        }
    }

    ExtractedPage { links, resources }
}
