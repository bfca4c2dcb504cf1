//! HTTP fetching.
//!
//! Two capabilities: page fetches returning status and body, and streamed
//! resource downloads written chunk-by-chunk to disk. Failures are
//! classified into [`FetchError`] for the caller to record; nothing here
//! retries or aborts the run.

use std::path::Path;
use std::time::Duration;

use reqwest::Client;
use thiserror::Error;
use tokio::io::AsyncWriteExt;

/// A successfully fetched page.
#[derive(Debug)]
pub struct Page {
    /// Final URL after any redirects the client followed.
    pub final_url: String,
    pub status_code: u16,
    pub body: String,
}

/// Why a fetch or download failed. Per-URL, never fatal to the run.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request timeout")]
    Timeout,

    #[error("connection failed")]
    Connect,

    #[error("HTTP {0}")]
    Status(u16),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Builds the HTTP client shared by all workers of a run.
pub fn build_http_client(user_agent: &str, timeout_secs: u64) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent.to_string())
        .timeout(Duration::from_secs(timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

fn classify(e: reqwest::Error) -> FetchError {
    if e.is_timeout() {
        FetchError::Timeout
    } else if e.is_connect() {
        FetchError::Connect
    } else {
        FetchError::Transport(e.to_string())
    }
}

/// Fetches a page, returning its body on a 2xx response.
///
/// Non-success statuses are failures (`FetchError::Status`); the caller
/// records them and moves on.
pub async fn fetch_page(client: &Client, url: &str) -> Result<Page, FetchError> {
    let response = client.get(url).send().await.map_err(classify)?;

    let status = response.status();
    let final_url = response.url().to_string();

    if !status.is_success() {
        return Err(FetchError::Status(status.as_u16()));
    }

    let body = response.text().await.map_err(classify)?;

    Ok(Page {
        final_url,
        status_code: status.as_u16(),
        body,
    })
}

/// Downloads a resource, streaming response chunks to `dest`.
///
/// Returns the number of bytes written. The file is created up front and
/// truncated, so a re-download of the same basename is last-write-wins.
pub async fn fetch_resource(
    client: &Client,
    url: &str,
    dest: &Path,
) -> Result<u64, FetchError> {
    let mut response = client.get(url).send().await.map_err(classify)?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status(status.as_u16()));
    }

    let mut file = tokio::fs::File::create(dest).await?;
    let mut written: u64 = 0;
    while let Some(chunk) = response.chunk().await.map_err(classify)? {
        file.write_all(&chunk).await?;
        written += chunk.len() as u64;
    }
    file.flush().await?;

    Ok(written)
}
