//! Search-as-you-type with stale-result rejection.
//!
//! Each call takes a ticket from a generation counter when it starts. When
//! its remote call returns, it may only write results if its ticket is still
//! the newest one. Older calls are left to finish; their results are dropped.
//! After a write, a settle window holds back the next write so that a burst
//! of keystrokes resolves into one stable result list.

use std::future::Future;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use streamdock_config::SearchConfig;
use tracing::debug;

use super::errors::SearchError;
use crate::remote::RemoteError;

/// What happened to one search call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome<T> {
    /// Query too short: visible results cleared, no remote call made.
    Skipped,
    /// Results written to the visible set.
    Applied(Vec<T>),
    /// A newer call was issued meanwhile; these results were discarded.
    Stale,
}

#[derive(Debug)]
struct SearchState<T> {
    generation: u64,
    results: Vec<T>,
    settle_until: Option<Instant>,
}

/// Debounced search over any result type.
#[derive(Debug)]
pub struct DebouncedSearch<T> {
    state: Mutex<SearchState<T>>,
    min_query_len: usize,
    settle_delay: Duration,
}

impl<T: Clone> DebouncedSearch<T> {
    pub fn new(min_query_len: usize, settle_delay: Duration) -> Self {
        Self {
            state: Mutex::new(SearchState {
                generation: 0,
                results: Vec::new(),
                settle_until: None,
            }),
            min_query_len,
            settle_delay,
        }
    }

    pub fn from_config(config: &SearchConfig) -> Self {
        Self::new(config.min_query_len, config.settle_delay())
    }

    fn lock(&self) -> MutexGuard<'_, SearchState<T>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Snapshot of the visible results.
    pub fn results(&self) -> Vec<T> {
        self.lock().results.clone()
    }

    pub fn generation(&self) -> u64 {
        self.lock().generation
    }

    /// Drop visible results and invalidate every call in flight.
    pub fn clear(&self) {
        let mut state = self.lock();
        state.generation += 1;
        state.results.clear();
    }

    /// Invalidate calls in flight without touching visible results.
    ///
    /// Used when the user picks a result: pending searches for the text
    /// they were typing must not overwrite the list afterwards.
    pub fn supersede(&self) {
        self.lock().generation += 1;
    }

    /// Whether a query would reach the network.
    pub fn is_searchable(&self, query: &str) -> bool {
        query.chars().count() >= self.min_query_len
    }

    fn issue_ticket(&self) -> u64 {
        let mut state = self.lock();
        state.generation += 1;
        state.generation
    }

    fn is_current(&self, ticket: u64) -> bool {
        self.lock().generation == ticket
    }

    async fn wait_for_settle(&self) {
        loop {
            let wait = {
                let state = self.lock();
                state
                    .settle_until
                    .map(|until| until.saturating_duration_since(Instant::now()))
                    .unwrap_or_default()
            };
            if wait.is_zero() {
                return;
            }
            smol::Timer::after(wait).await;
        }
    }

    /// Run one search call for `query`, fetching with `fetch`.
    ///
    /// A failed call that is still current clears the visible results, so
    /// a failure reads as "no results".
    pub async fn search<F, Fut>(
        &self,
        query: &str,
        fetch: F,
    ) -> Result<SearchOutcome<T>, SearchError>
    where
        F: FnOnce(String) -> Fut,
        Fut: Future<Output = Result<Vec<T>, RemoteError>>,
    {
        let ticket = self.issue_ticket();

        if !self.is_searchable(query) {
            self.lock().results.clear();
            debug!(
                event = "core.search.query_skipped",
                query_len = query.chars().count(),
                min_query_len = self.min_query_len
            );
            return Ok(SearchOutcome::Skipped);
        }

        debug!(event = "core.search.query_started", query = query, ticket = ticket);

        let results = match fetch(query.to_string()).await {
            Ok(results) => results,
            Err(source) => {
                let mut state = self.lock();
                if state.generation == ticket {
                    state.results.clear();
                }
                return Err(SearchError::Remote {
                    query: query.to_string(),
                    source,
                });
            }
        };

        self.wait_for_settle().await;

        let mut state = self.lock();
        if state.generation != ticket {
            debug!(
                event = "core.search.results_discarded",
                query = query,
                ticket = ticket,
                current = state.generation
            );
            return Ok(SearchOutcome::Stale);
        }

        state.results = results.clone();
        state.settle_until = Some(Instant::now() + self.settle_delay);
        drop(state);

        debug!(
            event = "core.search.results_applied",
            query = query,
            result_count = results.len()
        );

        Ok(SearchOutcome::Applied(results))
    }
}
