//! Search controller: hydration, debounced dispatch and URL synchronization.
//!
//! The controller owns three pieces of session state and nothing else:
//!
//! - the [`Lifecycle`] (hydration happens exactly once)
//! - the last query string written to the URL
//! - the pending debounce timer
//!
//! Every operation mutates the [`SearchStore`] through its setters and then
//! runs [`SearchController::sync`], which compares the canonical query string
//! of (filters, sort, page) against what it saw before. A new value
//! reschedules the debounce; a value different from the URL emits one
//! [`Action::ReplaceUrl`]. The URL is read only at hydration, so there is no
//! URL-to-state path that could loop.
//!
//! # Example
//!
//! ```rust
//! use musician_search::app::{Action, SearchController, SearchStore};
//! use musician_search::domain::FiltersPatch;
//! use musician_search::timer::{ManualScheduler, Scheduler};
//! use std::rc::Rc;
//! use std::time::Duration;
//!
//! let clock = Rc::new(ManualScheduler::new());
//! let scheduler: Rc<dyn Scheduler> = clock.clone();
//! let mut controller = SearchController::new(scheduler, Duration::from_millis(350));
//! let mut store = SearchStore::new(12);
//!
//! controller.hydrate(&mut store, "?page=3");
//! let actions = controller.update_filters(&mut store, FiltersPatch::default().city("Recife"));
//! assert_eq!(actions, vec![Action::ReplaceUrl { query: "city=Recife".to_string() }]);
//! assert_eq!(store.page().get(), 1);
//! ```

use super::actions::Action;
use super::modes::Lifecycle;
use super::store::SearchStore;
use crate::domain::{FiltersPatch, Page, SearchFilters, SortKey, ViewMode};
use crate::query;
use crate::timer::{Scheduler, TimerHandle, TimerId};
use crate::worker::{WorkerMessage, WorkerResponse};
use std::rc::Rc;
use std::time::Duration;

/// Quiescence window before a search is dispatched.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(350);

/// Orchestrates the search store, the URL and the listing worker.
pub struct SearchController {
    scheduler: Rc<dyn Scheduler>,
    debounce: Duration,
    lifecycle: Lifecycle,
    last_emitted_query: String,
    last_observed: Option<String>,
    pending: Option<TimerHandle>,
}

impl SearchController {
    #[must_use]
    pub fn new(scheduler: Rc<dyn Scheduler>, debounce: Duration) -> Self {
        Self {
            scheduler,
            debounce,
            lifecycle: Lifecycle::default(),
            last_emitted_query: String::new(),
            last_observed: None,
            pending: None,
        }
    }

    #[must_use]
    pub const fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    #[must_use]
    pub const fn is_hydrated(&self) -> bool {
        self.lifecycle.is_hydrated()
    }

    #[must_use]
    pub const fn debounce(&self) -> Duration {
        self.debounce
    }

    /// Query string most recently written to (or read from) the URL.
    #[must_use]
    pub fn last_emitted_query(&self) -> &str {
        &self.last_emitted_query
    }

    /// Id of the armed debounce timer, if a search is pending.
    #[must_use]
    pub fn pending_timer(&self) -> Option<TimerId> {
        self.pending.as_ref().map(TimerHandle::id)
    }

    /// Reads the initial state from the URL query and marks the controller
    /// hydrated.
    ///
    /// Runs once. Later calls, and calls after unmount, return no actions.
    /// A URL that is not already canonical is rewritten once.
    pub fn hydrate(&mut self, store: &mut SearchStore, raw_query: &str) -> Vec<Action> {
        if self.lifecycle != Lifecycle::NotHydrated {
            tracing::debug!(lifecycle = ?self.lifecycle, "hydration already done, ignoring");
            return Vec::new();
        }

        let raw_query = raw_query.strip_prefix('?').unwrap_or(raw_query);
        let state = query::parse_query(raw_query);
        tracing::debug!(
            query = raw_query,
            sort_by = %state.sort_by,
            page = %state.page,
            "hydrating from url"
        );

        store.set_filters(FiltersPatch::from(state.filters));
        store.set_sort_by(state.sort_by);
        store.set_page(state.page);

        self.lifecycle = Lifecycle::Hydrated;
        self.last_emitted_query = raw_query.to_string();
        self.sync(store)
    }

    /// Merges `patch` into the filters and returns to page 1.
    pub fn update_filters(&mut self, store: &mut SearchStore, patch: FiltersPatch) -> Vec<Action> {
        if !self.is_hydrated() {
            return Vec::new();
        }
        store.set_filters(patch);
        store.set_page(Page::FIRST);
        self.sync(store)
    }

    /// Replaces all filters and returns to page 1.
    pub fn replace_filters(&mut self, store: &mut SearchStore, filters: SearchFilters) -> Vec<Action> {
        if !self.is_hydrated() {
            return Vec::new();
        }
        store.set_filters(FiltersPatch::from(filters));
        store.set_page(Page::FIRST);
        self.sync(store)
    }

    /// Resets every filter to its default and returns to page 1.
    pub fn clear_all_filters(&mut self, store: &mut SearchStore) -> Vec<Action> {
        if !self.is_hydrated() {
            return Vec::new();
        }
        store.clear_filters();
        store.set_page(Page::FIRST);
        self.sync(store)
    }

    /// Changes the ordering and returns to page 1.
    pub fn change_sort(&mut self, store: &mut SearchStore, sort_by: SortKey) -> Vec<Action> {
        if !self.is_hydrated() {
            return Vec::new();
        }
        store.set_sort_by(sort_by);
        store.set_page(Page::FIRST);
        self.sync(store)
    }

    /// Moves to `page`, leaving filters and sort alone.
    pub fn change_page(&mut self, store: &mut SearchStore, page: Page) -> Vec<Action> {
        if !self.is_hydrated() {
            return Vec::new();
        }
        store.set_page(page);
        self.sync(store)
    }

    /// Switches between grid and list presentation. Not part of the URL and
    /// never triggers a search.
    pub fn change_view(&mut self, store: &mut SearchStore, view: ViewMode) -> bool {
        if !self.is_hydrated() || store.view() == view {
            return false;
        }
        store.set_view(view);
        true
    }

    /// Dispatches a search now, dropping any pending debounced dispatch.
    pub fn apply_search(&mut self, store: &mut SearchStore) -> Vec<Action> {
        if !self.is_hydrated() {
            return Vec::new();
        }
        if let Some(handle) = self.pending.take() {
            tracing::debug!(timer = %handle.id(), "explicit search supersedes pending dispatch");
        }
        vec![Self::dispatch(store)]
    }

    /// Handles an elapsed timer. Only the currently pending timer dispatches.
    pub fn timer_fired(&mut self, store: &mut SearchStore, id: TimerId) -> Vec<Action> {
        if !self.is_hydrated() {
            return Vec::new();
        }
        if self.pending_timer() != Some(id) {
            tracing::trace!(timer = %id, "ignoring stale timer");
            return Vec::new();
        }
        self.pending = None;
        vec![Self::dispatch(store)]
    }

    /// Hands a worker response to the store. Returns `true` if it was applied.
    pub fn receive(&mut self, store: &mut SearchStore, response: WorkerResponse) -> bool {
        if !self.is_hydrated() {
            tracing::debug!(
                generation = response.generation(),
                lifecycle = ?self.lifecycle,
                "response outside hydrated lifecycle dropped"
            );
            return false;
        }
        match response {
            WorkerResponse::SearchCompleted { generation, page } => {
                store.complete(generation, Ok(page))
            }
            WorkerResponse::SearchFailed {
                generation,
                message,
            } => store.complete(generation, Err(message)),
        }
    }

    /// Releases the pending timer. Every later call is a no-op.
    pub fn unmount(&mut self) {
        if let Some(handle) = self.pending.take() {
            tracing::debug!(timer = %handle.id(), "canceling pending search on unmount");
        }
        self.lifecycle = Lifecycle::Unmounted;
    }

    fn sync(&mut self, store: &SearchStore) -> Vec<Action> {
        let canonical = query::serialize(store.filters(), store.sort_by(), store.page());
        let mut actions = Vec::new();

        if self.last_observed.as_deref() != Some(canonical.as_str()) {
            // Assigning drops the previous handle, which cancels its timer.
            self.pending = Some(TimerHandle::start(&self.scheduler, self.debounce));
            tracing::trace!(query = %canonical, "search debounced");
            self.last_observed = Some(canonical.clone());
        }

        if canonical != self.last_emitted_query {
            tracing::debug!(from = %self.last_emitted_query, to = %canonical, "replacing url query");
            self.last_emitted_query.clone_from(&canonical);
            actions.push(Action::ReplaceUrl { query: canonical });
        }

        actions
    }

    fn dispatch(store: &mut SearchStore) -> Action {
        let query = store.search();
        Action::PostToWorker(WorkerMessage::search(query))
    }
}

impl std::fmt::Debug for SearchController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchController")
            .field("debounce", &self.debounce)
            .field("lifecycle", &self.lifecycle)
            .field("last_emitted_query", &self.last_emitted_query)
            .field("pending", &self.pending)
            .finish_non_exhaustive()
    }
}
