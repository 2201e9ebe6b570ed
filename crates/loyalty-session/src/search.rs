//! # Search Channels
//!
//! One [`SearchChannel`] per search box. Keystrokes are trimmed, checked for
//! minimum length and debounced; when the timer fires the channel hands a
//! numbered request to a dispatcher, which runs it on its own task and sends
//! the outcome back to the session as a [`SearchEvent`].
//!
//! ## Request Sequencing
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  keystrokes ──► DebounceTimer ──► seq=1 "dio"  ─────────────┐ (slow)   │
//! │                                   seq=2 "dior" ──┐           │          │
//! │                                                  ▼           ▼          │
//! │  session:                            accept seq=2 ✓   drop seq=1 ✗     │
//! │                                                                         │
//! │  Only the response to the latest issued request is shown. Clearing     │
//! │  the box also invalidates anything still in flight.                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use loyalty_core::validation::validate_search_query;
use loyalty_core::{Customer, Product};
use tracing::{debug, trace};

use crate::debounce::DebounceTimer;
use crate::error::SearchError;

// =============================================================================
// Catalog Search
// =============================================================================

/// Backend answering the two search boxes.
///
/// Implementations are called from spawned tasks, never from the session
/// itself, so a slow endpoint cannot stall cart edits.
#[async_trait]
pub trait CatalogSearch: Send + Sync {
    /// Customers whose name, tax id or phone match `query`.
    async fn search_customers(&self, query: &str) -> Result<Vec<Customer>, SearchError>;

    /// Products whose name, brand or variant match `query`.
    async fn search_products(&self, query: &str) -> Result<Vec<Product>, SearchError>;
}

/// Which search box a request belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchKind {
    Customers,
    Products,
}

impl SearchKind {
    /// Notice shown when a request of this kind fails.
    pub fn failure_message(&self) -> &'static str {
        match self {
            SearchKind::Customers => "Error searching customers",
            SearchKind::Products => "Error searching products",
        }
    }
}

// =============================================================================
// Results
// =============================================================================

/// What a results list currently shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchResults<T> {
    /// Nothing searched yet, or the box holds too short a query.
    Cleared,
    /// The endpoint answered with zero records.
    NoResults,
    /// Records in endpoint order.
    Found(Vec<T>),
}

impl<T> Default for SearchResults<T> {
    fn default() -> Self {
        SearchResults::Cleared
    }
}

impl<T> SearchResults<T> {
    /// Wraps an endpoint response; an empty list becomes [`SearchResults::NoResults`].
    pub fn from_records(records: Vec<T>) -> Self {
        if records.is_empty() {
            SearchResults::NoResults
        } else {
            SearchResults::Found(records)
        }
    }

    /// Records currently listed (empty unless `Found`).
    pub fn records(&self) -> &[T] {
        match self {
            SearchResults::Found(records) => records,
            _ => &[],
        }
    }

    /// Record at a list position.
    pub fn get(&self, index: usize) -> Option<&T> {
        self.records().get(index)
    }

    pub fn is_cleared(&self) -> bool {
        matches!(self, SearchResults::Cleared)
    }
}

// =============================================================================
// Search Events
// =============================================================================

/// A finished search request, delivered to the session's event queue.
#[derive(Debug, Clone)]
pub enum SearchEvent {
    Customers {
        seq: u64,
        query: String,
        outcome: Result<Vec<Customer>, SearchError>,
    },
    Products {
        seq: u64,
        query: String,
        outcome: Result<Vec<Product>, SearchError>,
    },
}

impl SearchEvent {
    pub fn kind(&self) -> SearchKind {
        match self {
            SearchEvent::Customers { .. } => SearchKind::Customers,
            SearchEvent::Products { .. } => SearchKind::Products,
        }
    }

    pub fn seq(&self) -> u64 {
        match self {
            SearchEvent::Customers { seq, .. } | SearchEvent::Products { seq, .. } => *seq,
        }
    }
}

// =============================================================================
// Search Channel
// =============================================================================

/// Result of feeding one keystroke into a channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryInput {
    /// Too short: results cleared, nothing scheduled.
    Cleared,
    /// The trimmed query will be searched once the box goes quiet.
    Scheduled(String),
}

/// Result of applying a response to a channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseOutcome {
    /// Superseded by a newer request or a cleared box; ignored.
    Stale,
    /// Results replaced.
    Updated,
    /// The request failed; results left as they were.
    Failed(SearchError),
}

/// State of one search box.
#[derive(Debug)]
pub struct SearchChannel<T> {
    kind: SearchKind,
    debounce: Duration,
    min_query_len: usize,
    timer: DebounceTimer,
    /// Sequence number of the latest issued request (or clear).
    latest: Arc<AtomicU64>,
    results: SearchResults<T>,
}

impl<T> SearchChannel<T> {
    pub fn new(kind: SearchKind, debounce: Duration, min_query_len: usize) -> Self {
        SearchChannel {
            kind,
            debounce,
            min_query_len,
            timer: DebounceTimer::new(),
            latest: Arc::new(AtomicU64::new(0)),
            results: SearchResults::Cleared,
        }
    }

    pub fn results(&self) -> &SearchResults<T> {
        &self.results
    }

    /// Handles the box's new text.
    ///
    /// A short query clears the results at once. Otherwise the debounce timer
    /// restarts; when it fires, `dispatch` receives the request's sequence
    /// number and the trimmed query. Must be called inside a tokio runtime.
    pub fn on_input<F>(&mut self, raw: &str, dispatch: F) -> QueryInput
    where
        F: FnOnce(u64, String) + Send + 'static,
    {
        let query = match validate_search_query(raw, self.min_query_len) {
            Ok(query) => query,
            Err(e) => {
                trace!(kind = ?self.kind, error = %e, "Query not searchable");
                self.clear();
                return QueryInput::Cleared;
            }
        };

        let latest = Arc::clone(&self.latest);
        let issued = query.clone();
        self.timer.start(self.debounce, move || {
            let seq = latest.fetch_add(1, Ordering::SeqCst) + 1;
            dispatch(seq, issued);
        });

        QueryInput::Scheduled(query)
    }

    /// Applies a response. Anything but the latest request is dropped.
    pub fn apply(&mut self, seq: u64, outcome: Result<Vec<T>, SearchError>) -> ResponseOutcome {
        let latest = self.latest.load(Ordering::SeqCst);
        if seq != latest {
            debug!(kind = ?self.kind, seq, latest, "Dropping stale search response");
            return ResponseOutcome::Stale;
        }

        match outcome {
            Ok(records) => {
                self.results = SearchResults::from_records(records);
                ResponseOutcome::Updated
            }
            Err(e) => ResponseOutcome::Failed(e),
        }
    }

    /// Empties the list, cancels the pending timer and invalidates
    /// in-flight requests.
    pub fn clear(&mut self) {
        self.timer.cancel();
        self.latest.fetch_add(1, Ordering::SeqCst);
        self.results = SearchResults::Cleared;
    }
}
