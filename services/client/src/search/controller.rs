//! services/client/src/search/controller.rs
//!
//! Owns the search box state and makes sure only the most recently issued
//! search can update it.
//!
//! Each `submit` takes a ticket from a monotonically increasing counter and
//! cancels whatever request was in flight before it. When a request resolves,
//! its result is applied only if its ticket is still the latest one; anything
//! else is reported as `SearchOutcome::Superseded` and dropped.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use textbook_core::domain::SearchResult;
use textbook_core::ports::{PortError, RetrievalService};
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error};

//=========================================================================================
// State and Outcome Types
//=========================================================================================

/// What a search box renders.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchState {
    pub results: Vec<SearchResult>,
    /// Inline error banner, if the last applied search failed.
    pub error: Option<String>,
    pub loading: bool,
    /// The query whose results are currently shown.
    pub query: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    /// The results were applied to the state.
    Results(Vec<SearchResult>),
    /// The search failed; the banner text was applied to the state.
    Failed { message: String, cause: PortError },
    /// A newer search was issued before this one resolved. State untouched.
    Superseded,
}

/// Formats the inline banner shown for a failed search.
pub fn error_banner(err: &PortError) -> String {
    match err {
        PortError::Validation(msg) => msg.clone(),
        other => format!("Failed to retrieve results: {}", other),
    }
}

//=========================================================================================
// The Controller
//=========================================================================================

pub struct SearchController {
    retrieval: Arc<dyn RetrievalService>,
    endpoint_base_url: String,
    latest_ticket: AtomicU64,
    in_flight: Mutex<CancellationToken>,
    state: Mutex<SearchState>,
}

impl SearchController {
    pub fn new(retrieval: Arc<dyn RetrievalService>, endpoint_base_url: impl Into<String>) -> Self {
        Self {
            retrieval,
            endpoint_base_url: endpoint_base_url.into(),
            latest_ticket: AtomicU64::new(0),
            in_flight: Mutex::new(CancellationToken::new()),
            state: Mutex::new(SearchState::default()),
        }
    }

    /// A snapshot of the current state.
    pub async fn state(&self) -> SearchState {
        self.state.lock().await.clone()
    }

    /// Runs a search and applies its outcome unless a newer search has been
    /// submitted in the meantime.
    pub async fn submit(&self, query: &str) -> SearchOutcome {
        let ticket = self.latest_ticket.fetch_add(1, Ordering::SeqCst) + 1;

        // Blank queries never reach the network.
        if query.trim().is_empty() {
            let cause = PortError::Validation("Please enter a search query".to_string());
            return self.apply(ticket, query, Err(cause)).await;
        }

        let cancel = {
            let mut in_flight = self.in_flight.lock().await;
            in_flight.cancel();
            *in_flight = CancellationToken::new();
            in_flight.clone()
        };

        {
            let mut state = self.state.lock().await;
            state.loading = true;
            state.error = None;
        }

        debug!(ticket, "Submitting search");
        let result = tokio::select! {
            _ = cancel.cancelled() => {
                debug!(ticket, "Search cancelled by a newer submission");
                return SearchOutcome::Superseded;
            }
            result = self.retrieval.search(query, &self.endpoint_base_url) => result,
        };

        self.apply(ticket, query, result).await
    }

    async fn apply(
        &self,
        ticket: u64,
        query: &str,
        result: Result<Vec<SearchResult>, PortError>,
    ) -> SearchOutcome {
        let mut state = self.state.lock().await;

        // Checked under the state lock so a newer submission cannot slip in between.
        if self.latest_ticket.load(Ordering::SeqCst) != ticket {
            debug!(ticket, "Discarding stale search result");
            return SearchOutcome::Superseded;
        }

        state.loading = false;
        match result {
            Ok(results) => {
                state.results = results.clone();
                state.error = None;
                state.query = Some(query.to_string());
                SearchOutcome::Results(results)
            }
            Err(cause) => {
                if !cause.is_validation() {
                    error!(error = %cause, "Search error");
                }
                let message = error_banner(&cause);
                state.error = Some(message.clone());
                SearchOutcome::Failed { message, cause }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;
    use textbook_core::ports::PortResult;

    /// Answers each query after a per-query delay, echoing the query as content.
    struct ScriptedRetrieval {
        calls: AtomicUsize,
    }

    impl ScriptedRetrieval {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl RetrievalService for ScriptedRetrieval {
        async fn search(&self, query: &str, _base: &str) -> PortResult<Vec<SearchResult>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match query {
                "slow" => tokio::time::sleep(Duration::from_millis(200)).await,
                "broken" => return Err(PortError::Http { status: 500 }),
                _ => {}
            }
            Ok(vec![SearchResult {
                content: query.to_string(),
                source: "ch1".to_string(),
                score: 0.5,
            }])
        }
    }

    #[tokio::test]
    async fn blank_query_shows_banner_without_calling_backend() {
        let retrieval = Arc::new(ScriptedRetrieval::new());
        let controller = SearchController::new(retrieval.clone(), "http://api.test");

        let outcome = controller.submit("   ").await;

        assert!(matches!(outcome, SearchOutcome::Failed { ref cause, .. } if cause.is_validation()));
        assert_eq!(retrieval.calls.load(Ordering::SeqCst), 0);
        assert_eq!(
            controller.state().await.error.as_deref(),
            Some("Please enter a search query")
        );
    }

    #[tokio::test]
    async fn http_failure_banner_contains_status() {
        let controller = SearchController::new(Arc::new(ScriptedRetrieval::new()), "http://api.test");

        let outcome = controller.submit("broken").await;

        let SearchOutcome::Failed { message, cause } = outcome else {
            panic!("expected failure");
        };
        assert_eq!(cause.status(), Some(500));
        assert!(message.contains("500"));
        let state = controller.state().await;
        assert!(!state.loading);
        assert_eq!(state.error, Some(message));
    }

    #[tokio::test]
    async fn success_replaces_results_and_clears_error() {
        let controller = SearchController::new(Arc::new(ScriptedRetrieval::new()), "http://api.test");
        controller.submit("broken").await;

        let outcome = controller.submit("gait").await;

        assert!(matches!(outcome, SearchOutcome::Results(ref r) if r.len() == 1));
        let state = controller.state().await;
        assert_eq!(state.error, None);
        assert_eq!(state.query.as_deref(), Some("gait"));
        assert_eq!(state.results[0].content, "gait");
    }

    #[tokio::test]
    async fn older_search_cannot_overwrite_newer_one() {
        let controller = Arc::new(SearchController::new(
            Arc::new(ScriptedRetrieval::new()),
            "http://api.test",
        ));

        let slow = {
            let controller = controller.clone();
            tokio::spawn(async move { controller.submit("slow").await })
        };
        // Let the slow search get in flight first.
        tokio::time::sleep(Duration::from_millis(20)).await;
        let fast = controller.submit("fast").await;

        assert!(matches!(fast, SearchOutcome::Results(_)));
        assert_eq!(slow.await.unwrap(), SearchOutcome::Superseded);

        let state = controller.state().await;
        assert_eq!(state.query.as_deref(), Some("fast"));
        assert_eq!(state.results[0].content, "fast");
        assert!(!state.loading);
    }
}
