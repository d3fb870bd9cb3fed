//! Event handling and state transition logic.
//!
//! Every input to the search core arrives as an [`Event`]: the initial URL,
//! visitor operations, elapsed timers and worker responses. [`handle_event`]
//! routes each one to the [`SearchController`] and returns the actions the
//! host must execute.
//!
//! # Architecture
//!
//! 1. Events arrive from the host runtime (UI, timer source, worker bridge)
//! 2. [`handle_event`] pattern-matches the event type
//! 3. The controller mutates the store through its setters
//! 4. Actions are collected and returned for execution
//!
//! The returned `bool` tells the host whether the view needs re-rendering.

use super::actions::Action;
use super::controller::SearchController;
use super::store::SearchStore;
use crate::domain::{FiltersPatch, Page, SearchFilters, SortKey, ViewMode};
use crate::timer::TimerId;
use crate::worker::WorkerResponse;

/// Events triggered by the URL, visitor input, timers or the worker.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// URL parameters became available. Hydrates on first delivery only.
    Mount {
        /// Raw query string, with or without the leading `?`.
        query: String,
    },

    /// Merge a partial filter update. Returns to page 1.
    UpdateFilters(FiltersPatch),
    /// Replace every filter. Returns to page 1.
    ReplaceFilters(SearchFilters),
    /// Reset filters to defaults. Returns to page 1.
    ClearAllFilters,
    /// Search now instead of waiting for the debounce window.
    ApplySearch,

    /// Change the ordering, given in its wire form. Unknown values mean
    /// the default ordering. Returns to page 1.
    ChangeSort(String),
    /// Go to a page. Values below 1 mean page 1.
    ChangePage(i64),
    ChangeView(ViewMode),

    /// A timer armed by the controller elapsed.
    TimerFired(TimerId),

    /// Wraps a response from the listing worker.
    WorkerResponse(WorkerResponse),

    /// The owning view is going away.
    Unmount,
}

/// Processes an event, mutates controller and store, and returns actions to
/// execute in order.
///
/// # Example
///
/// ```rust
/// use musician_search::app::{handle_event, Event, SearchController, SearchStore};
/// use musician_search::timer::{ManualScheduler, Scheduler};
/// use std::rc::Rc;
/// use std::time::Duration;
///
/// let scheduler: Rc<dyn Scheduler> = Rc::new(ManualScheduler::new());
/// let mut controller = SearchController::new(scheduler, Duration::from_millis(350));
/// let mut store = SearchStore::new(12);
///
/// let (render, actions) = handle_event(
///     &mut controller,
///     &mut store,
///     Event::Mount { query: "?q=choro".to_string() },
/// );
/// assert!(render);
/// assert_eq!(actions.len(), 1); // url rewritten to `search=choro`
/// ```
pub fn handle_event(
    controller: &mut SearchController,
    store: &mut SearchStore,
    event: Event,
) -> (bool, Vec<Action>) {
    let _span = tracing::debug_span!("handle_event", event_type = event_name(&event)).entered();

    match event {
        Event::Mount { query } => {
            if controller.is_hydrated() {
                return (false, vec![]);
            }
            let actions = controller.hydrate(store, &query);
            (controller.is_hydrated(), actions)
        }
        Event::Unmount => {
            controller.unmount();
            (false, vec![])
        }
        Event::WorkerResponse(response) => {
            let applied = controller.receive(store, response);
            (applied, vec![])
        }
        _ if !controller.is_hydrated() => {
            tracing::debug!(lifecycle = ?controller.lifecycle(), "ignoring event");
            (false, vec![])
        }
        Event::UpdateFilters(patch) => {
            if patch.is_empty() {
                tracing::debug!("empty filter patch");
            }
            (true, controller.update_filters(store, patch))
        }
        Event::ReplaceFilters(filters) => (true, controller.replace_filters(store, filters)),
        Event::ClearAllFilters => (true, controller.clear_all_filters(store)),
        Event::ApplySearch => (true, controller.apply_search(store)),
        Event::ChangeSort(value) => {
            let sort_by = SortKey::from_param(&value);
            tracing::debug!(requested = %value, sort_by = %sort_by, "sort changed");
            (true, controller.change_sort(store, sort_by))
        }
        Event::ChangePage(page) => (true, controller.change_page(store, Page::new(page))),
        Event::ChangeView(view) => (controller.change_view(store, view), vec![]),
        Event::TimerFired(id) => {
            let actions = controller.timer_fired(store, id);
            (!actions.is_empty(), actions)
        }
    }
}

const fn event_name(event: &Event) -> &'static str {
    match event {
        Event::Mount { .. } => "mount",
        Event::UpdateFilters(_) => "update_filters",
        Event::ReplaceFilters(_) => "replace_filters",
        Event::ClearAllFilters => "clear_all_filters",
        Event::ApplySearch => "apply_search",
        Event::ChangeSort(_) => "change_sort",
        Event::ChangePage(_) => "change_page",
        Event::ChangeView(_) => "change_view",
        Event::TimerFired(_) => "timer_fired",
        Event::WorkerResponse(_) => "worker_response",
        Event::Unmount => "unmount",
    }
}
