//! Debounced, "last request wins" lookups for interactive input.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tracing::trace;

use crate::search::DistrictMatcher;

/// Monotonic request numbering. Only the most recently issued number is
/// current; anything older is stale.
#[derive(Debug, Default)]
pub struct LookupSequencer {
    latest: AtomicU64,
}

impl LookupSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue the next sequence number, making every earlier one stale.
    pub fn issue(&self) -> u64 {
        self.latest.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn is_current(&self, seq: u64) -> bool {
        self.latest.load(Ordering::SeqCst) == seq
    }

    pub fn latest(&self) -> u64 {
        self.latest.load(Ordering::SeqCst)
    }
}

/// Wraps lookups so that each waits out the debounce window and only the
/// newest one delivers a result.
#[derive(Debug)]
pub struct SearchSession {
    matcher: Arc<DistrictMatcher>,
    sequencer: LookupSequencer,
    debounce: Duration,
}

impl SearchSession {
    pub fn new(matcher: Arc<DistrictMatcher>, debounce: Duration) -> Self {
        Self {
            matcher,
            sequencer: LookupSequencer::new(),
            debounce,
        }
    }

    pub fn debounce(&self) -> Duration {
        self.debounce
    }

    pub fn sequencer(&self) -> &LookupSequencer {
        &self.sequencer
    }

    /// Run `lookup` once the input has been stable for the debounce window.
    ///
    /// Returns `None` when newer input arrived before the window closed (the
    /// lookup never runs) or while the lookup was in flight (its result is
    /// discarded).
    pub async fn debounced<T, F, Fut>(&self, lookup: F) -> Option<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        let seq = self.sequencer.issue();
        tokio::time::sleep(self.debounce).await;
        if !self.sequencer.is_current(seq) {
            trace!(seq, "Superseded before lookup");
            return None;
        }

        let result = lookup().await;
        if self.sequencer.is_current(seq) {
            Some(result)
        } else {
            trace!(seq, "Superseded during lookup, discarding result");
            None
        }
    }

    /// Debounced [`DistrictMatcher::search`].
    pub async fn search(&self, query: &str) -> Option<Vec<String>> {
        let matcher = Arc::clone(&self.matcher);
        self.debounced(|| async move { matcher.search(query) }).await
    }
}
