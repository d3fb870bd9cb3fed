//! Musician search: the search-state core of a musician booking marketplace.
//!
//! The crate keeps three things consistent:
//! - the structured filter state (filters, sort, page) held by the store
//! - the canonical URL query string
//! - the paginated result set from the listing endpoint
//!
//! It does so under debounced, cancelable, hydration-aware updates.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  Host runtime (main.rs)                             │  ← URL, timers, worker
//! └─────────────────────────────────────────────────────┘
//!                        │ Event / Action
//! ┌─────────────────────────────────────────────────────┐
//! │  Application Layer (app/)                           │
//! │  - SearchController (hydration, debounce, URL sync) │
//! │  - SearchStore (filters, sort, page, results)       │
//! └─────────────────────────────────────────────────────┘
//!         │                    │                    │
//! ┌───────────────┐   ┌───────────────┐   ┌───────────────┐
//! │ Query codec   │   │ Timer         │   │ Worker        │
//! │ (query/)      │   │ (timer/)      │   │ (worker/)     │
//! │ - parse       │   │ - Scheduler   │   │ - messages    │
//! │ - serialize   │   │ - TimerHandle │   │ - ListingWorker│
//! └───────────────┘   └───────────────┘   └───────────────┘
//!                                                  │
//!                                         ┌───────────────┐
//!                                         │ Listing       │
//!                                         │ (listing/)    │
//!                                         └───────────────┘
//! ```
//!
//! # Modules
//!
//! - [`app`]: Controller, store and the event/action model
//! - [`domain`]: Filters, counter, musicians, errors
//! - [`query`]: Filter codec between URL query strings and filters
//! - [`timer`]: Cancelable timers and a virtual clock
//! - [`listing`]: Listing backend trait and in-memory catalogue
//! - [`worker`]: Message bridge to the listing backend
//! - [`infrastructure`]: Page location and data paths
//! - [`ui`]: View model
//! - [`observability`]: OpenTelemetry tracing with file export
//!
//! # Example
//!
//! ```rust
//! use musician_search::{handle_event, initialize, Action, Config, Event};
//! use musician_search::timer::{ManualScheduler, Scheduler};
//! use std::rc::Rc;
//!
//! let clock = Rc::new(ManualScheduler::new());
//! let scheduler: Rc<dyn Scheduler> = clock.clone();
//! let (mut controller, mut store) = initialize(&Config::default(), scheduler);
//!
//! let (_, actions) = handle_event(
//!     &mut controller,
//!     &mut store,
//!     Event::Mount { query: "?location=Recife&page=0".to_string() },
//! );
//! assert_eq!(actions, vec![Action::ReplaceUrl { query: "city=Recife".to_string() }]);
//!
//! let fired = clock.advance(controller.debounce());
//! let (_, actions) = handle_event(&mut controller, &mut store, Event::TimerFired(fired[0]));
//! assert!(matches!(actions[0], Action::PostToWorker(_)));
//! ```

#![allow(clippy::multiple_crate_versions)]

pub mod app;
pub mod domain;
pub mod infrastructure;
pub mod listing;
pub mod query;
pub mod timer;
pub mod worker;

pub mod ui;

pub mod observability;

pub use app::{handle_event, Action, Event, SearchController, SearchStore};
pub use domain::{Result, SearchError};

use crate::listing::InMemoryListing;
use crate::timer::Scheduler;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use std::rc::Rc;
use std::time::Duration;

const DEFAULT_DEBOUNCE_MS: u64 = 350;
const DEFAULT_PAGE_SIZE: u32 = 12;
const DEFAULT_BASE_PATH: &str = "/musicos";

/// Runtime configuration.
///
/// Loaded from a TOML file, or from a flat string map where every key is
/// optional and unparseable values fall back to defaults.
///
/// ```toml
/// debounce_ms = 350
/// page_size = 12
/// catalogue_path = "data/musicians.json"
/// trace_level = "debug"
/// base_path = "/musicos"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Quiescence window before a search is dispatched, in milliseconds.
    pub debounce_ms: u64,

    /// Results per page requested from the listing.
    pub page_size: u32,

    /// JSON catalogue to serve; the bundled one when unset.
    pub catalogue_path: Option<String>,

    /// `EnvFilter` directive, e.g. `"debug"` or `"musician_search=trace"`.
    /// Default: `"info"`
    pub trace_level: Option<String>,

    /// Path of the search page.
    pub base_path: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            page_size: DEFAULT_PAGE_SIZE,
            catalogue_path: None,
            trace_level: None,
            base_path: DEFAULT_BASE_PATH.to_string(),
        }
    }
}

impl Config {
    /// Parses configuration from a string map with fallback defaults.
    ///
    /// ```rust
    /// use std::collections::BTreeMap;
    /// use musician_search::Config;
    ///
    /// let mut map = BTreeMap::new();
    /// map.insert("debounce_ms".to_string(), "200".to_string());
    /// map.insert("page_size".to_string(), "zero".to_string());
    ///
    /// let config = Config::from_map(&map);
    /// assert_eq!(config.debounce_ms, 200);
    /// assert_eq!(config.page_size, 12);
    /// ```
    #[must_use]
    pub fn from_map(map: &BTreeMap<String, String>) -> Self {
        let non_empty = |key: &str| {
            map.get(key)
                .map(|value| value.trim())
                .filter(|value| !value.is_empty())
        };

        Self {
            debounce_ms: non_empty("debounce_ms")
                .and_then(|value| value.parse().ok())
                .unwrap_or(DEFAULT_DEBOUNCE_MS),
            page_size: non_empty("page_size")
                .and_then(|value| value.parse().ok())
                .filter(|size| *size > 0)
                .unwrap_or(DEFAULT_PAGE_SIZE),
            catalogue_path: non_empty("catalogue_path").map(str::to_string),
            trace_level: non_empty("trace_level").map(str::to_string),
            base_path: non_empty("base_path").map_or_else(
                || DEFAULT_BASE_PATH.to_string(),
                str::to_string,
            ),
        }
    }

    /// Parses a TOML document. Missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Config`] on malformed TOML, unknown keys or a
    /// zero page size.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(source).map_err(|e| SearchError::Config(e.to_string()))?;
        if config.page_size == 0 {
            return Err(SearchError::Config("page_size must be positive".to_string()));
        }
        Ok(config)
    }

    /// Reads and parses a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Io`] if the file cannot be read, otherwise as
    /// [`Config::from_toml_str`].
    pub fn from_file(path: &Path) -> Result<Self> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    #[must_use]
    pub const fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Loads the configured catalogue, or the bundled one.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured file is missing or malformed.
    pub fn load_catalogue(&self) -> Result<InMemoryListing> {
        self.catalogue_path.as_ref().map_or_else(InMemoryListing::builtin, |path| {
            InMemoryListing::from_file(Path::new(path))
        })
    }
}

/// Creates a controller and an empty store from configuration.
///
/// The controller is not hydrated yet; deliver [`Event::Mount`] with the page
/// URL's query to start it.
pub fn initialize(config: &Config, scheduler: Rc<dyn Scheduler>) -> (SearchController, SearchStore) {
    tracing::debug!(
        debounce_ms = config.debounce_ms,
        page_size = config.page_size,
        "initializing musician search"
    );
    (
        SearchController::new(scheduler, config.debounce()),
        SearchStore::new(config.page_size),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toml_fills_missing_keys_with_defaults() {
        let config = Config::from_toml_str("page_size = 6\ntrace_level = \"debug\"").unwrap();
        assert_eq!(config.page_size, 6);
        assert_eq!(config.debounce_ms, 350);
        assert_eq!(config.base_path, "/musicos");
        assert_eq!(config.trace_level.as_deref(), Some("debug"));
    }

    #[test]
    fn toml_rejects_zero_page_size_and_unknown_keys() {
        assert!(matches!(
            Config::from_toml_str("page_size = 0"),
            Err(SearchError::Config(_))
        ));
        assert!(matches!(
            Config::from_toml_str("pagesize = 3"),
            Err(SearchError::Config(_))
        ));
    }

    #[test]
    fn map_ignores_blank_values() {
        let mut map = BTreeMap::new();
        map.insert("base_path".to_string(), "  ".to_string());
        map.insert("catalogue_path".to_string(), "/srv/musicians.json".to_string());
        let config = Config::from_map(&map);
        assert_eq!(config.base_path, "/musicos");
        assert_eq!(config.catalogue_path.as_deref(), Some("/srv/musicians.json"));
    }

    #[test]
    fn file_config_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("search.toml");
        std::fs::write(&path, "debounce_ms = 100\n").unwrap();
        assert_eq!(Config::from_file(&path).unwrap().debounce(), Duration::from_millis(100));
        assert!(matches!(
            Config::from_file(&dir.path().join("missing.toml")),
            Err(SearchError::Io(_))
        ));
    }
}
