//! Search-as-you-type without flooding the backend.
//!
//! # Design
//! `SearchDispatcher` is `Idle` until a query of at least `min_chars`
//! (after trimming) arrives; it is then `Pending` until the debounce timer
//! fires. Shorter input clears the view at once and cancels the timer.
//!
//! Requests already in flight are never cancelled, so responses can land
//! out of order. Each fired search takes a sequence number and a response is
//! only rendered if it is still the latest; a clear also bumps the
//! sequence, so a late response cannot repaint results the user erased.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error};

use crate::config::ClientConfig;
use crate::debounce::Debouncer;
use crate::site::SiteApi;
use crate::types::SearchResult;

/// UI collaborator that owns the results container.
pub trait ResultsView: Send + Sync {
    /// Show `items` in order; an empty slice means "no results".
    fn render(&self, items: &[SearchResult]);

    fn clear(&self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOptions {
    pub debounce: Duration,
    pub min_chars: usize,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(300),
            min_chars: 2,
        }
    }
}

impl From<&ClientConfig> for SearchOptions {
    fn from(config: &ClientConfig) -> Self {
        Self {
            debounce: config.search_debounce,
            min_chars: config.search_min_chars,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchState {
    Idle,
    Pending,
}

pub struct SearchDispatcher<V> {
    debouncer: Debouncer<String>,
    view: Arc<V>,
    latest: Arc<AtomicU64>,
    min_chars: usize,
}

impl<V: ResultsView + 'static> SearchDispatcher<V> {
    pub fn new(site: SiteApi, view: Arc<V>, options: SearchOptions) -> Self {
        let latest = Arc::new(AtomicU64::new(0));
        let debouncer = {
            let view = Arc::clone(&view);
            let latest = Arc::clone(&latest);
            Debouncer::new(options.debounce, move |query: String| {
                perform_search(site.clone(), Arc::clone(&view), Arc::clone(&latest), query)
            })
        };
        Self {
            debouncer,
            view,
            latest,
            min_chars: options.min_chars,
        }
    }

    /// Feed the current contents of the search box.
    pub fn on_input(&mut self, raw: &str) -> SearchState {
        let query = raw.trim();
        if query.chars().count() < self.min_chars {
            self.debouncer.cancel();
            self.latest.fetch_add(1, Ordering::SeqCst);
            self.view.clear();
            return SearchState::Idle;
        }
        self.debouncer.call(query.to_string());
        SearchState::Pending
    }

    pub fn state(&self) -> SearchState {
        if self.debouncer.is_pending() {
            SearchState::Pending
        } else {
            SearchState::Idle
        }
    }
}

async fn perform_search<V: ResultsView>(site: SiteApi, view: Arc<V>, latest: Arc<AtomicU64>, query: String) {
    let seq = latest.fetch_add(1, Ordering::SeqCst) + 1;
    match site.search(&query).await {
        Ok(results) => {
            if latest.load(Ordering::SeqCst) == seq {
                view.render(&results);
            } else {
                debug!(%query, seq, "discarding stale search response");
            }
        }
        Err(e) => error!(%query, error = %e, "search failed"),
    }
}
