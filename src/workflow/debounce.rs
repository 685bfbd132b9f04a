//! Debounced search where the newest query wins

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use crate::client::DirectoryApi;
use crate::services::directory::{self, MIN_QUERY_LEN, SearchOutcome};

/// Delays each search and drops results that a newer query has superseded
#[derive(Debug, Clone)]
pub struct SearchDebouncer {
    delay: Duration,
    latest: Arc<AtomicU64>,
}

impl SearchDebouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            latest: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Run a search after the debounce delay.
    ///
    /// Returns `None` when a newer call arrived before this one finished; the
    /// caller should keep whatever the newer call produces instead. Short
    /// queries resolve immediately to an empty outcome.
    pub async fn search(&self, api: &dyn DirectoryApi, query: &str) -> Option<SearchOutcome> {
        let ticket = self.latest.fetch_add(1, Ordering::SeqCst) + 1;

        if query.trim().chars().count() < MIN_QUERY_LEN {
            return Some(SearchOutcome::default());
        }

        tokio::time::sleep(self.delay).await;
        if !self.is_current(ticket) {
            log::debug!("Search {:?} superseded before sending", query);
            return None;
        }

        let outcome = directory::search(api, query).await;
        if !self.is_current(ticket) {
            log::debug!("Discarding stale results for {:?}", query);
            return None;
        }

        Some(outcome)
    }

    fn is_current(&self, ticket: u64) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket
    }
}
