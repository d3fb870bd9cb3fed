//! Timing and URL-sync behavior of the search controller, driven through
//! `handle_event` on a virtual clock.

use musician_search::app::{handle_event, Action, Event, SearchController, SearchStore};
use musician_search::domain::{
    FiltersPatch, ListingPage, Musician, Page, Pagination, SearchFilters, ValueSet,
};
use musician_search::listing::InMemoryListing;
use musician_search::timer::{ManualScheduler, Scheduler};
use musician_search::worker::{ListingWorker, WorkerMessage, WorkerResponse};
use std::rc::Rc;
use std::time::Duration;

const WINDOW: Duration = Duration::from_millis(350);

struct Harness {
    clock: Rc<ManualScheduler>,
    controller: SearchController,
    store: SearchStore,
    url_writes: Vec<String>,
    posted: Vec<WorkerMessage>,
}

impl Harness {
    fn new() -> Self {
        let clock = Rc::new(ManualScheduler::new());
        let scheduler: Rc<dyn Scheduler> = clock.clone();
        Self {
            clock,
            controller: SearchController::new(scheduler, WINDOW),
            store: SearchStore::new(12),
            url_writes: Vec::new(),
            posted: Vec::new(),
        }
    }

    fn mounted(query: &str) -> Self {
        let mut harness = Self::new();
        harness.send(Event::Mount {
            query: query.to_string(),
        });
        harness
    }

    fn send(&mut self, event: Event) -> bool {
        let (render, actions) = handle_event(&mut self.controller, &mut self.store, event);
        for action in actions {
            match action {
                Action::ReplaceUrl { query } => self.url_writes.push(query),
                Action::PostToWorker(message) => self.posted.push(message),
            }
        }
        render
    }

    /// Advances the clock to `at` (absolute) and delivers elapsed timers.
    fn advance_to(&mut self, at: Duration) {
        let by = at.saturating_sub(self.clock.now());
        for id in self.clock.advance(by) {
            self.send(Event::TimerFired(id));
        }
    }
}

fn ms(value: u64) -> Duration {
    Duration::from_millis(value)
}

fn posted_query(message: &WorkerMessage) -> &musician_search::listing::ListingQuery {
    match message {
        WorkerMessage::Search { query, .. } => query,
    }
}

#[test]
fn burst_of_changes_dispatches_once_after_last_change() {
    let mut h = Harness::mounted("");
    h.advance_to(WINDOW);
    h.posted.clear();

    let start = h.clock.now();
    h.send(Event::UpdateFilters(FiltersPatch::default().search("s")));
    h.advance_to(start + ms(100));
    h.send(Event::UpdateFilters(FiltersPatch::default().search("sa")));
    h.advance_to(start + ms(200));
    h.send(Event::UpdateFilters(FiltersPatch::default().search("sax")));

    h.advance_to(start + ms(549));
    assert!(h.posted.is_empty());

    h.advance_to(start + ms(550));
    assert_eq!(h.posted.len(), 1);
    assert_eq!(posted_query(&h.posted[0]).filters.search, "sax");

    h.advance_to(start + ms(5_000));
    assert_eq!(h.posted.len(), 1);
}

#[test]
fn hydration_schedules_the_first_search() {
    let mut h = Harness::mounted("?city=Recife&sortBy=newest&page=2");
    assert!(h.url_writes.is_empty());
    assert!(h.posted.is_empty());

    h.advance_to(WINDOW);
    assert_eq!(h.posted.len(), 1);
    let query = posted_query(&h.posted[0]);
    assert_eq!(query.filters.city, "Recife");
    assert_eq!(query.page.get(), 2);
}

#[test]
fn filter_update_resets_page() {
    let mut h = Harness::mounted("page=3");
    assert_eq!(h.store.page().get(), 3);

    h.send(Event::UpdateFilters(FiltersPatch::default().city("Recife")));
    assert_eq!(h.store.page(), Page::FIRST);
    assert_eq!(h.url_writes, vec!["city=Recife"]);
}

#[test]
fn replace_and_clear_reset_page() {
    let mut h = Harness::mounted("genres=rock&page=5");

    h.send(Event::ReplaceFilters(SearchFilters {
        instruments: ValueSet::from_values(["bass"]),
        ..SearchFilters::default()
    }));
    assert_eq!(h.store.page(), Page::FIRST);
    assert!(h.store.filters().genres.is_empty());

    h.send(Event::ChangePage(4));
    h.send(Event::ClearAllFilters);
    assert_eq!(h.store.page(), Page::FIRST);
    assert!(h.store.filters().is_default());
    assert_eq!(
        h.url_writes,
        vec!["instruments=bass", "instruments=bass&page=4", ""]
    );
}

#[test]
fn unchanged_state_writes_url_once() {
    let mut h = Harness::mounted("");
    h.send(Event::UpdateFilters(FiltersPatch::default().rating("4")));
    h.send(Event::UpdateFilters(FiltersPatch::default().rating("4")));
    h.send(Event::ChangePage(1));
    assert_eq!(h.url_writes, vec!["rating=4"]);
}

#[test]
fn equal_sets_in_different_order_are_not_a_change() {
    let mut h = Harness::mounted("genres=pop&genres=rock");
    let pending = h.controller.pending_timer();
    h.send(Event::UpdateFilters(
        FiltersPatch::default().genres(ValueSet::from_values(["rock", "pop"])),
    ));
    assert!(h.url_writes.is_empty());
    assert_eq!(h.controller.pending_timer(), pending);
}

#[test]
fn non_canonical_url_is_rewritten_once() {
    let mut h = Harness::mounted("?q=choro&genres=samba,choro&page=-1&sortBy=bogus");
    assert_eq!(h.url_writes, vec!["search=choro&genres=choro&genres=samba"]);
    h.send(Event::ChangePage(1));
    assert_eq!(h.url_writes.len(), 1);
}

#[test]
fn operations_before_hydration_are_no_ops() {
    let mut h = Harness::new();
    assert!(!h.send(Event::UpdateFilters(FiltersPatch::default().city("Natal"))));
    assert!(!h.send(Event::ApplySearch));
    assert!(!h.send(Event::ChangeSort("newest".to_string())));
    assert!(h.url_writes.is_empty());
    assert!(h.posted.is_empty());
    assert_eq!(h.clock.armed(), 0);
    assert!(h.store.filters().is_default());
}

#[test]
fn responses_before_any_search_are_ignored() {
    let unsolicited = || {
        Event::WorkerResponse(WorkerResponse::SearchCompleted {
            generation: 0,
            page: ListingPage {
                musicians: vec![Musician::new(7, "Ana", "Recife", "PE", 150)],
                pagination: Pagination::new(1, 12, 1),
            },
        })
    };

    let mut h = Harness::new();
    assert!(!h.send(unsolicited()));
    assert!(h.store.musicians().is_empty());

    h.send(Event::Mount {
        query: String::new(),
    });
    assert!(!h.send(unsolicited()));
    assert!(h.store.musicians().is_empty());
    assert_eq!(h.store.latest_generation(), 0);
}

#[test]
fn hydration_runs_once() {
    let mut h = Harness::mounted("city=Recife");
    h.send(Event::Mount {
        query: "city=Natal&page=9".to_string(),
    });
    assert_eq!(h.store.filters().city, "Recife");
    assert_eq!(h.store.page(), Page::FIRST);
}

#[test]
fn unmount_cancels_pending_dispatch() {
    let mut h = Harness::mounted("");
    h.send(Event::UpdateFilters(FiltersPatch::default().state("BA")));
    assert_eq!(h.clock.armed(), 1);

    h.send(Event::Unmount);
    assert_eq!(h.clock.armed(), 0);
    h.advance_to(ms(10_000));
    assert!(h.posted.is_empty());
    assert!(!h.send(Event::UpdateFilters(FiltersPatch::default().state("SP"))));
}

#[test]
fn apply_search_dispatches_immediately_and_drops_pending() {
    let mut h = Harness::mounted("");
    h.send(Event::UpdateFilters(FiltersPatch::default().date("2026-06-24")));
    h.send(Event::ApplySearch);
    assert_eq!(h.posted.len(), 1);
    assert_eq!(posted_query(&h.posted[0]).filters.date, "2026-06-24");

    h.advance_to(ms(1_000));
    assert_eq!(h.posted.len(), 1);
}

#[test]
fn view_change_is_local() {
    let mut h = Harness::mounted("");
    h.advance_to(WINDOW);
    let posted = h.posted.len();
    assert!(h.send(Event::ChangeView(musician_search::domain::ViewMode::List)));
    h.advance_to(ms(2_000));
    assert_eq!(h.posted.len(), posted);
    assert!(h.url_writes.is_empty());
}

#[test]
fn stale_response_does_not_overwrite_newer_results() {
    let worker = ListingWorker::new(Box::new(InMemoryListing::builtin().unwrap()));
    let mut h = Harness::mounted("");

    h.send(Event::ApplySearch);
    h.send(Event::UpdateFilters(FiltersPatch::default().city("Recife")));
    h.send(Event::ApplySearch);
    assert_eq!(h.posted.len(), 2);

    let older = worker.handle(&h.posted[0]);
    let newer = worker.handle(&h.posted[1]);

    assert!(h.send(Event::WorkerResponse(newer)));
    assert!(!h.send(Event::WorkerResponse(older)));
    assert_eq!(h.store.pagination().total, 2);
    assert!(h
        .store
        .musicians()
        .iter()
        .all(|musician| musician.city == "Recife"));
    assert!(!h.store.is_loading());
}

#[test]
fn failed_search_keeps_previous_results() {
    let worker = ListingWorker::new(Box::new(InMemoryListing::builtin().unwrap()));
    let mut h = Harness::mounted("");
    h.send(Event::ApplySearch);
    let ok = worker.handle(&h.posted[0]);
    h.send(Event::WorkerResponse(ok));
    let before = h.store.musicians().len();
    assert!(before > 0);

    h.send(Event::ApplySearch);
    let generation = h.posted[1].generation();
    h.send(Event::WorkerResponse(WorkerResponse::SearchFailed {
        generation,
        message: "listing unavailable".to_string(),
    }));
    assert_eq!(h.store.musicians().len(), before);
    assert_eq!(h.store.error(), Some("listing unavailable"));
}
