//! Result aggregation across workers.
//!
//! Workers and the scheduler push records concurrently; the engine takes
//! a snapshot once the run has drained. This replaces per-worker output
//! files with a single collection under one lock.

use std::sync::Mutex;

/// One outcome produced during a crawl.
///
/// Each record is written exactly once by the worker (or scheduler, for
/// `Discovered`) that produced it. The frontier guarantees at most one
/// `Discovered` record per distinct URL per run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultRecord {
    /// A URL was claimed for visiting at the given depth.
    Discovered {
        url: String,
        depth: u32,
        /// Page the URL was discovered on; `None` for the seed.
        source: Option<String>,
    },

    /// A claimed URL could not be fetched. Non-fatal; the crawl continues.
    FetchFailed { url: String, reason: String },

    /// An embedded resource was downloaded to the resource store.
    ResourceDownloaded { url: String, bytes: u64 },

    /// An embedded resource download failed. Non-fatal.
    ResourceFailed { url: String, reason: String },
}

impl ResultRecord {
    /// The URL this record is about.
    pub fn url(&self) -> &str {
        match self {
            ResultRecord::Discovered { url, .. }
            | ResultRecord::FetchFailed { url, .. }
            | ResultRecord::ResourceDownloaded { url, .. }
            | ResultRecord::ResourceFailed { url, .. } => url,
        }
    }
}

/// Collects result records from all workers of a run.
#[derive(Debug, Default)]
pub struct Aggregator {
    records: Mutex<Vec<ResultRecord>>,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a record. Safe under concurrent calls; a record is either
    /// fully present or absent, never torn.
    pub fn record(&self, record: ResultRecord) {
        let mut records = self.records.lock().unwrap();
        records.push(record);
    }

    /// Copies out everything recorded so far, in submission order.
    ///
    /// The engine calls this after the run has drained, at which point
    /// repeated calls return the same sequence.
    pub fn snapshot(&self) -> Vec<ResultRecord> {
        self.records.lock().unwrap().clone()
    }

    /// Number of `Discovered` records so far.
    pub fn discovered_count(&self) -> usize {
        self.records
            .lock()
            .unwrap()
            .iter()
            .filter(|r| matches!(r, ResultRecord::Discovered { .. }))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_record_and_snapshot_preserve_order() {
        let aggregator = Aggregator::new();
        aggregator.record(ResultRecord::Discovered {
            url: "https://a/".to_string(),
            depth: 0,
            source: None,
        });
        aggregator.record(ResultRecord::FetchFailed {
            url: "https://b/".to_string(),
            reason: "HTTP 500".to_string(),
        });

        let snapshot = aggregator.snapshot();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot[0].url(), "https://a/");
        assert_eq!(snapshot[1].url(), "https://b/");
    }

    #[test]
    fn test_snapshot_is_stable() {
        let aggregator = Aggregator::new();
        aggregator.record(ResultRecord::ResourceDownloaded {
            url: "https://a/logo.png".to_string(),
            bytes: 1024,
        });
        assert_eq!(aggregator.snapshot(), aggregator.snapshot());
    }

    #[test]
    fn test_concurrent_records_none_lost() {
        let aggregator = Arc::new(Aggregator::new());
        let threads = 8;
        let per_thread = 100;

        let handles: Vec<_> = (0..threads)
            .map(|t| {
                let aggregator = Arc::clone(&aggregator);
                std::thread::spawn(move || {
                    for i in 0..per_thread {
                        aggregator.record(ResultRecord::Discovered {
                            url: format!("https://example.com/{}/{}", t, i),
                            depth: 1,
                            source: None,
                        });
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(aggregator.snapshot().len(), threads * per_thread);
        assert_eq!(aggregator.discovered_count(), threads * per_thread);
    }
}
