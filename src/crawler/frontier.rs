//! The frontier: at-most-once claim tracking for URLs.
//!
//! The claim set is one of exactly two pieces of shared mutable state in a
//! run (the other being the aggregator's record list). Both sit behind a
//! mutex, which keeps the data-race surface to those two locks.

use crate::url::partition_of;
use std::collections::HashSet;
use std::sync::Mutex;

/// Tracks which URLs have been claimed for visiting during one run.
///
/// `try_claim` returns true exactly once per distinct absolute URL string,
/// no matter how many workers race on it. The set grows monotonically and
/// is never pruned within a run.
#[derive(Debug)]
pub struct Frontier {
    claimed: Mutex<HashSet<String>>,
    /// (index, count) when this process owns one slice of a partitioned
    /// claim space; `None` means it owns everything.
    partition: Option<(u32, u32)>,
}

impl Frontier {
    /// A frontier owning the entire URL space (single-process runs).
    pub fn new() -> Self {
        Self {
            claimed: Mutex::new(HashSet::new()),
            partition: None,
        }
    }

    /// A frontier owning only the slice of URL space hashing to `index`
    /// out of `count` partitions. Cooperating processes each construct
    /// their own slice so their visited sets stay disjoint.
    pub fn partitioned(index: u32, count: u32) -> Self {
        debug_assert!(index < count);
        Self {
            claimed: Mutex::new(HashSet::new()),
            partition: if count > 1 { Some((index, count)) } else { None },
        }
    }

    /// Whether this process's claim space covers `url`.
    pub fn owns(&self, url: &str) -> bool {
        match self.partition {
            Some((index, count)) => partition_of(url, count) == index,
            None => true,
        }
    }

    /// Attempts to claim `url` for visiting.
    ///
    /// Returns true iff the claim succeeded, granting the caller the
    /// exclusive right to fetch this URL for the rest of the run. URLs
    /// outside this process's partition are never claimed.
    pub fn try_claim(&self, url: &str) -> bool {
        if !self.owns(url) {
            return false;
        }
        let mut claimed = self.claimed.lock().unwrap();
        claimed.insert(url.to_string())
    }

    /// Number of URLs claimed so far.
    pub fn claimed_count(&self) -> usize {
        self.claimed.lock().unwrap().len()
    }
}

impl Default for Frontier {
    fn default() -> Self {
        Self::new()
    }
}
