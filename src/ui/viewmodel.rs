//! View model computed from the search store and the current location.
//!
//! The view model carries display-ready strings only. It is recomputed after
//! every handled event and never feeds back into the store.
//!
//! # Example
//!
//! ```rust
//! use musician_search::app::SearchStore;
//! use musician_search::infrastructure::Location;
//! use musician_search::ui::SearchViewModel;
//!
//! let store = SearchStore::new(12);
//! let location = Location::parse("/musicos");
//! let vm = SearchViewModel::compute(&store, &location, 0);
//! assert_eq!(vm.active_filter_count, 0);
//! assert_eq!(vm.page_label, "Page 1 of 1");
//! ```

use crate::app::SearchStore;
use crate::domain::{count_active_filters, Musician, ViewMode};
use crate::infrastructure::Location;
use std::fmt;

/// Everything the search page renders.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchViewModel {
    /// Current address, path plus canonical query.
    pub url: String,

    /// Badge on the filter toggle.
    pub active_filter_count: usize,

    /// Sort key as shown in the sort selector.
    pub sort_label: &'static str,

    /// e.g. `"14 musicians found"`.
    pub result_summary: String,

    /// e.g. `"Page 2 of 4"`.
    pub page_label: String,

    pub view: ViewMode,
    pub is_loading: bool,

    /// Error banner text. Results below it are the last successful ones.
    pub error: Option<String>,

    pub items: Vec<ResultCard>,
}

/// One result card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultCard {
    pub name: String,
    pub place: String,
    pub price: String,
    pub rating: String,
    pub tags: String,
    pub tenure: String,
}

impl SearchViewModel {
    /// Builds the view model; `now` is a Unix timestamp used for tenure labels.
    #[must_use]
    pub fn compute(store: &SearchStore, location: &Location, now: i64) -> Self {
        let pagination = store.pagination();
        let result_summary = match pagination.total {
            _ if store.is_loading() && store.musicians().is_empty() => "Searching...".to_string(),
            0 => "No musicians match these filters".to_string(),
            1 => "1 musician found".to_string(),
            n => format!("{n} musicians found"),
        };

        Self {
            url: location.href(),
            active_filter_count: count_active_filters(store.filters()),
            sort_label: sort_label(store),
            result_summary,
            page_label: format!(
                "Page {} of {}",
                pagination.page,
                pagination.total_pages.max(1)
            ),
            view: store.view(),
            is_loading: store.is_loading(),
            error: store.error().map(str::to_string),
            items: store
                .musicians()
                .iter()
                .map(|musician| ResultCard::from_musician(musician, now))
                .collect(),
        }
    }
}

fn sort_label(store: &SearchStore) -> &'static str {
    use crate::domain::SortKey;
    match store.sort_by() {
        SortKey::Rating => "Best rated",
        SortKey::PriceLow => "Lowest price",
        SortKey::PriceHigh => "Highest price",
        SortKey::Newest => "Newest",
    }
}

impl ResultCard {
    fn from_musician(musician: &Musician, now: i64) -> Self {
        let tags: Vec<&str> = musician
            .instruments
            .iter()
            .chain(&musician.genres)
            .map(String::as_str)
            .collect();

        Self {
            name: musician.name.clone(),
            place: format!("{}, {}", musician.city, musician.state),
            price: format!("R$ {}/h", musician.price_per_hour),
            rating: if musician.rating > 0.0 {
                format!("{:.1}", musician.rating)
            } else {
                "-".to_string()
            },
            tags: tags.join(", "),
            tenure: musician.tenure_label(now),
        }
    }
}

impl fmt::Display for SearchViewModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "url: {}", self.url)?;
        writeln!(
            f,
            "filters: {} active | sort: {} | view: {}",
            self.active_filter_count,
            self.sort_label,
            self.view.as_str()
        )?;
        if let Some(error) = &self.error {
            writeln!(f, "error: {error}")?;
        }
        let loading = if self.is_loading { " (loading)" } else { "" };
        writeln!(f, "{} | {}{loading}", self.result_summary, self.page_label)?;

        for card in &self.items {
            match self.view {
                ViewMode::Grid => writeln!(
                    f,
                    "  [{}] {} | {} | {}",
                    card.rating, card.name, card.place, card.price
                )?,
                ViewMode::List => writeln!(
                    f,
                    "  {} - {} - {} - {} - {} ({})",
                    card.name, card.place, card.price, card.rating, card.tags, card.tenure
                )?,
            }
        }
        Ok(())
    }
}
