//! The popup controller.
//!
//! Owns the last fetched result set and the popup state. Everything the user
//! can do in the popup (search, filter) goes through here; surfaces only draw.

use crate::backend::SearchBackend;
use crate::config::{self, BACKEND_URL_KEY, ConfigStore};
use crate::filter;
use crate::view::{Notice, PopupState, PopupView, ResultsPane, Stats, render_results};
use crate::{Error, Result};
use chrono::Local;
use leetsearch_types::{SearchResponse, UserRecord};
use tracing::{debug, error, info, warn};

/// How a call to [`PopupController::search`] ended.
#[derive(Debug)]
pub enum SearchOutcome {
    /// Query was blank, nothing was sent
    EmptyQuery,
    Loaded { total: u64, shown: usize },
    Failed(Error),
}

impl SearchOutcome {
    #[must_use]
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

pub struct PopupController<S, B, V> {
    store: S,
    backend: B,
    view: V,
    current_results: Vec<UserRecord>,
    state: PopupState,
}

impl<S, B, V> PopupController<S, B, V>
where
    S: ConfigStore,
    B: SearchBackend,
    V: PopupView,
{
    pub fn new(store: S, backend: B, view: V) -> Self {
        Self {
            store,
            backend,
            view,
            current_results: Vec::new(),
            state: PopupState::default(),
        }
    }

    /// Results of the last successful search, unfiltered.
    pub fn current_results(&self) -> &[UserRecord] {
        &self.current_results
    }

    pub fn state(&self) -> &PopupState {
        &self.state
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Stored backend base URL, or the built-in default.
    pub async fn backend_base(&self) -> String {
        config::backend_base_or_default(&self.store).await
    }

    /// Persist a new backend base URL. Failures are logged and otherwise ignored.
    pub async fn set_backend_base(&self, url: &str) {
        if let Err(e) = self.store.set(BACKEND_URL_KEY, url).await {
            warn!("Failed to persist backend URL {}: {}", url, e);
        }
    }

    /// Run a college search and render the outcome.
    ///
    /// Blank queries show a prompt and never reach the backend. Every failure
    /// (bad URL, transport, status, body) renders the same notice.
    pub async fn search(&mut self, query: &str) -> SearchOutcome {
        let query = query.trim();
        if query.is_empty() {
            self.state.results = ResultsPane::Notice(Notice::EnterQuery);
            self.render();
            return SearchOutcome::EmptyQuery;
        }

        self.state.trigger.busy = true;
        self.state.results = ResultsPane::Cleared;
        self.render();

        let outcome = match self.fetch(query).await {
            Ok((base, response)) => {
                if let Some(url) = response.redirect_from(&base) {
                    info!("Backend moved from {} to {}", base, url);
                    self.set_backend_base(url).await;
                }
                self.load(response)
            }
            Err(e) => {
                error!("Search for '{}' failed: {}", query, e);
                self.state.results = ResultsPane::Notice(Notice::FetchFailed);
                SearchOutcome::Failed(e)
            }
        };

        self.state.trigger.busy = false;
        self.render();
        outcome
    }

    /// Re-render `current_results` narrowed by `text`.
    ///
    /// Never changes `current_results` and never talks to the backend.
    pub fn apply_filter(&mut self, text: &str) {
        let needle = filter::normalize_needle(text);
        let total = self.current_results.len();

        if needle.is_empty() {
            self.state.results = render_results(&self.current_results);
            self.state.stats = Some(Stats {
                matched: total as u64,
                filtered: total,
                refreshed_at: Local::now(),
            });
        } else {
            let filtered: Vec<&UserRecord> = self
                .current_results
                .iter()
                .filter(|u| filter::matches(u, &needle))
                .collect();
            let refreshed_at = self
                .state
                .stats
                .map_or_else(Local::now, |stats| stats.refreshed_at);

            self.state.stats = Some(Stats {
                matched: total as u64,
                filtered: filtered.len(),
                refreshed_at,
            });
            self.state.results = render_results(filtered);
        }

        debug!("Filter '{}' applied to {} results", needle, total);
        self.render();
    }

    async fn fetch(&self, query: &str) -> Result<(String, SearchResponse)> {
        let base = self.backend_base().await;
        debug!("Searching '{}' against {}", query, base);
        let response = self.backend.search(&base, query).await?;
        Ok((base, response))
    }

    fn load(&mut self, response: SearchResponse) -> SearchOutcome {
        let SearchResponse { results, total, .. } = response;
        self.current_results = results;

        let shown = self.current_results.len();
        self.state.filter_visible = shown > 0;
        self.state.results = render_results(&self.current_results);
        self.state.stats = Some(Stats {
            matched: total,
            filtered: shown,
            refreshed_at: Local::now(),
        });

        debug!("Loaded {} of {} matched profiles", shown, total);
        SearchOutcome::Loaded { total, shown }
    }

    fn render(&mut self) {
        self.view.render(&self.state);
    }
}
