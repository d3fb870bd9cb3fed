//! Line-driven host runtime for the search core.
//!
//! Stands in for the browser: it owns the page [`Location`], a virtual clock
//! and the listing worker, turns input lines into [`Event`]s and executes the
//! resulting [`Action`]s.
//!
//! ```text
//! stdin ──▶ Command ──▶ Event queue ──▶ handle_event ──▶ Actions
//!                           ▲                              │
//!                           ├── TimerFired ◀── wait <ms> ──┤ ReplaceUrl → Location
//!                           └── WorkerResponse ◀───────────┘ PostToWorker → ListingWorker
//! ```
//!
//! # Commands
//!
//! - `open <url>`: load a page URL and hydrate from its query
//! - `set key=value ...`: merge filters (URL parameter names)
//! - `replace key=value ...`: replace all filters
//! - `clear`: clear all filters
//! - `search`: search now
//! - `sort <key>`: `rating`, `price-low`, `price-high` or `newest`
//! - `page <n>`, `view grid|list`
//! - `wait <ms>`: advance the clock, firing due timers
//! - `show`: print the current page
//! - `quit`

#![allow(clippy::multiple_crate_versions)]

use musician_search::app::{Action, Event, SearchController, SearchStore};
use musician_search::domain::{SearchError, ViewMode};
use musician_search::infrastructure::Location;
use musician_search::query::{parse_patch, parse_query, QueryParams};
use musician_search::timer::{ManualScheduler, Scheduler};
use musician_search::ui::SearchViewModel;
use musician_search::worker::{ListingWorker, WorkerResponse};
use musician_search::{handle_event, Config, Result};
use std::collections::VecDeque;
use std::io::{self, BufRead, Write};
use std::path::Path;
use std::rc::Rc;
use std::time::Duration;

/// One parsed input line.
#[derive(Debug, Clone, PartialEq)]
enum Command {
    Open(String),
    Set(String),
    Replace(String),
    Clear,
    Search,
    Sort(String),
    Page(i64),
    View(ViewMode),
    Wait(u64),
    Show,
    Quit,
}

impl Command {
    fn parse(line: &str) -> std::result::Result<Self, String> {
        let line = line.trim();
        let (verb, rest) = line.split_once(' ').unwrap_or((line, ""));
        let rest = rest.trim();
        // `set city=Recife genres=rock` becomes `city=Recife&genres=rock`.
        let as_query = || rest.split_whitespace().collect::<Vec<_>>().join("&");

        match verb {
            "open" if !rest.is_empty() => Ok(Self::Open(rest.to_string())),
            "set" => Ok(Self::Set(as_query())),
            "replace" => Ok(Self::Replace(as_query())),
            "clear" => Ok(Self::Clear),
            "search" => Ok(Self::Search),
            "sort" => Ok(Self::Sort(rest.to_string())),
            "page" => rest
                .parse()
                .map(Self::Page)
                .map_err(|_| format!("not a page number: {rest}")),
            "view" => Ok(Self::View(ViewMode::from_param(rest))),
            "wait" => rest
                .parse()
                .map(Self::Wait)
                .map_err(|_| format!("not a duration in ms: {rest}")),
            "show" => Ok(Self::Show),
            "quit" | "exit" => Ok(Self::Quit),
            _ => Err(format!("unknown command: {line}")),
        }
    }
}

/// Host state: everything a browser tab would own.
struct Host {
    controller: SearchController,
    store: SearchStore,
    location: Location,
    worker: ListingWorker,
    clock: Rc<ManualScheduler>,
    queue: VecDeque<Event>,
}

impl Host {
    fn new(config: &Config) -> Result<Self> {
        let clock = Rc::new(ManualScheduler::new());
        let scheduler: Rc<dyn Scheduler> = clock.clone();
        let (controller, store) = musician_search::initialize(config, scheduler);
        let worker = ListingWorker::new(Box::new(config.load_catalogue()?));

        Ok(Self {
            controller,
            store,
            location: Location::parse(&config.base_path),
            worker,
            clock,
            queue: VecDeque::new(),
        })
    }

    /// Queues the events for a command and drains the queue.
    /// Returns `true` if the page should be printed.
    fn run(&mut self, command: Command) -> bool {
        let _span = tracing::debug_span!("host_command", command = ?command).entered();

        match command {
            Command::Open(url) => {
                let location = Location::parse(&url);
                let query = location.query().to_string();
                if !self.controller.is_hydrated() {
                    self.location = location;
                }
                self.queue.push_back(Event::Mount { query });
            }
            Command::Set(query) => {
                let patch = parse_patch(&QueryParams::parse(&query));
                self.queue.push_back(Event::UpdateFilters(patch));
            }
            Command::Replace(query) => {
                self.queue
                    .push_back(Event::ReplaceFilters(parse_query(&query).filters));
            }
            Command::Clear => self.queue.push_back(Event::ClearAllFilters),
            Command::Search => self.queue.push_back(Event::ApplySearch),
            Command::Sort(key) => self.queue.push_back(Event::ChangeSort(key)),
            Command::Page(page) => self.queue.push_back(Event::ChangePage(page)),
            Command::View(view) => self.queue.push_back(Event::ChangeView(view)),
            Command::Wait(ms) => {
                for id in self.clock.advance(Duration::from_millis(ms)) {
                    self.queue.push_back(Event::TimerFired(id));
                }
            }
            Command::Show => return true,
            Command::Quit => self.queue.push_back(Event::Unmount),
        }

        self.drain()
    }

    fn drain(&mut self) -> bool {
        let mut render = false;
        while let Some(event) = self.queue.pop_front() {
            let (should_render, actions) =
                handle_event(&mut self.controller, &mut self.store, event);
            tracing::debug!(
                action_count = actions.len(),
                should_render,
                "event handled"
            );
            render |= should_render;

            for action in actions {
                if let Err(e) = self.execute_action(action) {
                    tracing::warn!(error = %e, "action failed");
                    eprintln!("error: {e}");
                }
            }
        }
        render
    }

    fn execute_action(&mut self, action: Action) -> Result<()> {
        match action {
            Action::ReplaceUrl { query } => {
                tracing::debug!(query = %query, "history replace");
                self.location.replace_query(&query);
                Ok(())
            }
            Action::PostToWorker(message) => {
                let payload = serde_json::to_string(&message)?;
                let reply = self.worker.handle_payload(&payload)?;
                let response: WorkerResponse = serde_json::from_str(&reply).map_err(|e| {
                    SearchError::Worker(format!("undecodable worker response: {e}"))
                })?;
                self.queue.push_back(Event::WorkerResponse(response));
                Ok(())
            }
        }
    }

    fn print(&self, out: &mut impl Write) -> io::Result<()> {
        let now = chrono::Utc::now().timestamp();
        let view = SearchViewModel::compute(&self.store, &self.location, now);
        write!(out, "{view}")?;
        if let Some(id) = self.controller.pending_timer() {
            writeln!(out, "(search pending: {id})")?;
        }
        out.flush()
    }
}

fn load_config() -> Result<Config> {
    std::env::args()
        .nth(1)
        .map_or_else(|| Ok(Config::default()), |path| Config::from_file(Path::new(&path)))
}

fn main() {
    let config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("musician-search: {e}");
            std::process::exit(2);
        }
    };
    let trace_file = musician_search::observability::init_tracing(&config);
    tracing::debug!(trace_file = ?trace_file, "host starting");

    let mut host = match Host::new(&config) {
        Ok(host) => host,
        Err(e) => {
            eprintln!("musician-search: {e}");
            std::process::exit(1);
        }
    };

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    for line in stdin.lock().lines() {
        let Ok(line) = line else { break };
        if line.trim().is_empty() || line.trim_start().starts_with('#') {
            continue;
        }

        let command = match Command::parse(&line) {
            Ok(command) => command,
            Err(message) => {
                eprintln!("{message}");
                continue;
            }
        };
        let quit = command == Command::Quit;

        if host.run(command) && host.print(&mut out).is_err() {
            break;
        }
        if quit {
            return;
        }
    }

    host.run(Command::Quit);
}
