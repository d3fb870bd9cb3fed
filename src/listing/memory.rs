//! In-memory listing backend loaded from a JSON catalogue.
//!
//! The whole catalogue is read once and every query filters, ranks and pages
//! it in memory.
//!
//! # File Format
//!
//! ```json
//! {
//!   "version": 1,
//!   "musicians": [
//!     {
//!       "id": 1,
//!       "name": "Trio Pé de Serra",
//!       "city": "Caruaru",
//!       "state": "PE",
//!       "instruments": ["sanfona", "zabumba", "triangulo"],
//!       "genres": ["forro"],
//!       "availability": ["weekends"],
//!       "price_per_hour": 250,
//!       "rating": 4.8,
//!       "created_at": 1717200000,
//!       "unavailable_dates": ["2026-06-24"]
//!     }
//!   ]
//! }
//! ```
//!
//! # Matching Rules
//!
//! - free text: every whitespace token must fuzzy-match name, bio, instruments or genres
//! - city: case-insensitive equality
//! - state: exact code, skipped for "all"
//! - price: inclusive range over `price_per_hour`
//! - rating: minimum average
//! - date: the date must not be in `unavailable_dates`
//! - instruments, genres: any selected value matches
//! - availability: every selected tag is required
//!
//! Numeric and date filters that do not parse are ignored rather than
//! rejecting the query.

use super::backend::{ListingBackend, ListingQuery};
use crate::domain::error::{Result, SearchError};
use crate::domain::{ListingPage, Musician, Pagination, SearchFilters, SortKey, ValueSet};
use chrono::NaiveDate;
use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::path::Path;

/// Catalogue bundled with the crate, used when no file is configured.
const BUILTIN_CATALOGUE: &str = include_str!("../../data/musicians.json");

/// On-disk catalogue container.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CatalogueFile {
    /// Version of the catalogue format for future migrations.
    version: u32,

    #[serde(default)]
    musicians: Vec<Musician>,
}

/// Listing backend over an in-memory musician catalogue.
#[derive(Debug, Clone, Default)]
pub struct InMemoryListing {
    musicians: Vec<Musician>,
}

impl InMemoryListing {
    #[must_use]
    pub const fn new(musicians: Vec<Musician>) -> Self {
        Self { musicians }
    }

    /// Loads a catalogue from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a valid catalogue.
    pub fn from_file(path: &Path) -> Result<Self> {
        tracing::debug!(path = ?path, "loading musician catalogue");
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Parses a catalogue document.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or the version is unsupported.
    pub fn from_json(json: &str) -> Result<Self> {
        let file: CatalogueFile = serde_json::from_str(json)?;
        if file.version != 1 {
            return Err(SearchError::Listing(format!(
                "unsupported catalogue version {}",
                file.version
            )));
        }
        tracing::debug!(musician_count = file.musicians.len(), "catalogue loaded");
        Ok(Self::new(file.musicians))
    }

    /// The catalogue bundled with the crate.
    ///
    /// # Errors
    ///
    /// Only fails if the bundled document is corrupt.
    pub fn builtin() -> Result<Self> {
        Self::from_json(BUILTIN_CATALOGUE)
    }

    #[must_use]
    pub fn musicians(&self) -> &[Musician] {
        &self.musicians
    }
}

impl ListingBackend for InMemoryListing {
    fn search(&self, query: &ListingQuery) -> Result<ListingPage> {
        let _span = tracing::debug_span!(
            "listing_search",
            generation = query.generation,
            sort_by = %query.sort_by,
            page = query.page.get()
        )
        .entered();

        if query.page_size == 0 {
            return Err(SearchError::Listing("page_size must be positive".to_string()));
        }

        let criteria = Criteria::from_filters(&query.filters);
        let mut matched: Vec<&Musician> = self
            .musicians
            .iter()
            .filter(|musician| criteria.matches(musician))
            .collect();
        matched.sort_by(|a, b| compare(query.sort_by, a, b));

        let total = matched.len() as u64;
        let page_size = query.page_size as usize;
        let start = (query.page.get() as usize - 1).saturating_mul(page_size);
        let musicians: Vec<Musician> = matched
            .into_iter()
            .skip(start)
            .take(page_size)
            .cloned()
            .collect();

        tracing::debug!(total, returned = musicians.len(), "listing query answered");

        Ok(ListingPage {
            musicians,
            pagination: Pagination::new(query.page.get(), query.page_size, total),
        })
    }

    fn len(&self) -> usize {
        self.musicians.len()
    }
}

/// Filters pre-parsed once per query.
struct Criteria<'q> {
    tokens: Vec<String>,
    matcher: Option<SkimMatcherV2>,
    city: Option<String>,
    state: Option<&'q str>,
    price_min: Option<u32>,
    price_max: Option<u32>,
    rating: Option<f32>,
    date: Option<String>,
    instruments: &'q ValueSet,
    genres: &'q ValueSet,
    availability: &'q ValueSet,
}

impl<'q> Criteria<'q> {
    fn from_filters(filters: &'q SearchFilters) -> Self {
        let tokens: Vec<String> = filters
            .search
            .split_whitespace()
            .map(str::to_lowercase)
            .collect();
        let matcher = (!tokens.is_empty()).then(SkimMatcherV2::default);
        let city = Some(filters.city.trim().to_lowercase()).filter(|city| !city.is_empty());

        Self {
            tokens,
            matcher,
            city,
            state: filters.state_filter(),
            price_min: parse_number("priceMin", &filters.price_min),
            price_max: parse_number("priceMax", &filters.price_max),
            rating: parse_number("rating", &filters.rating),
            date: parse_date(&filters.date),
            instruments: &filters.instruments,
            genres: &filters.genres,
            availability: &filters.availability,
        }
    }

    fn matches(&self, musician: &Musician) -> bool {
        self.matches_text(musician)
            && self
                .city
                .as_ref()
                .map_or(true, |city| musician.city.to_lowercase() == *city)
            && self.state.map_or(true, |state| musician.state == state)
            && self.price_min.map_or(true, |min| musician.price_per_hour >= min)
            && self.price_max.map_or(true, |max| musician.price_per_hour <= max)
            && self.rating.map_or(true, |min| musician.rating >= min)
            && self
                .date
                .as_ref()
                .map_or(true, |date| !musician.unavailable_dates.contains(date))
            && any_of(self.instruments, &musician.instruments)
            && any_of(self.genres, &musician.genres)
            && self
                .availability
                .iter()
                .all(|tag| contains_ignore_case(&musician.availability, tag))
    }

    fn matches_text(&self, musician: &Musician) -> bool {
        let Some(matcher) = self.matcher.as_ref() else {
            return true;
        };
        let haystack = format!(
            "{} {} {} {}",
            musician.name,
            musician.bio,
            musician.instruments.join(" "),
            musician.genres.join(" ")
        )
        .to_lowercase();

        self.tokens
            .iter()
            .all(|token| matcher.fuzzy_match(&haystack, token).is_some())
    }
}

fn any_of(selected: &ValueSet, values: &[String]) -> bool {
    selected.is_empty() || selected.iter().any(|wanted| contains_ignore_case(values, wanted))
}

fn contains_ignore_case(values: &[String], wanted: &str) -> bool {
    values.iter().any(|value| value.eq_ignore_ascii_case(wanted))
}

fn parse_number<T: std::str::FromStr>(field: &str, raw: &str) -> Option<T> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    let parsed = raw.parse().ok();
    if parsed.is_none() {
        tracing::debug!(field, value = raw, "ignoring unparseable numeric filter");
    }
    parsed
}

fn parse_date(raw: &str) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        Ok(date) => Some(date.format("%Y-%m-%d").to_string()),
        Err(e) => {
            tracing::debug!(value = raw, error = %e, "ignoring unparseable date filter");
            None
        }
    }
}

fn compare(sort_by: SortKey, a: &Musician, b: &Musician) -> Ordering {
    let by_rating = b.rating.total_cmp(&a.rating);
    let primary = match sort_by {
        SortKey::Rating => by_rating,
        SortKey::PriceLow => a.price_per_hour.cmp(&b.price_per_hour).then(by_rating),
        SortKey::PriceHigh => b.price_per_hour.cmp(&a.price_per_hour).then(by_rating),
        SortKey::Newest => b.created_at.cmp(&a.created_at),
    };
    primary.then(a.id.cmp(&b.id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FiltersPatch, Page};

    fn musician(id: u64, name: &str, city: &str, state: &str, price: u32, rating: f32) -> Musician {
        Musician {
            rating,
            created_at: 1_700_000_000 + i64::try_from(id).unwrap_or_default(),
            ..Musician::new(id, name, city, state, price)
        }
    }

    fn catalogue() -> InMemoryListing {
        let mut sanfoneiro = musician(1, "Zé do Fole", "Caruaru", "PE", 250, 4.9);
        sanfoneiro.instruments = vec!["sanfona".to_string()];
        sanfoneiro.genres = vec!["forro".to_string(), "baiao".to_string()];
        sanfoneiro.availability = vec!["weekends".to_string(), "travel".to_string()];
        sanfoneiro.unavailable_dates = vec!["2026-06-24".to_string()];

        let mut guitarist = musician(2, "Ana Cordas", "Recife", "PE", 400, 4.5);
        guitarist.instruments = vec!["guitar".to_string(), "cavaquinho".to_string()];
        guitarist.genres = vec!["samba".to_string(), "choro".to_string()];
        guitarist.availability = vec!["weekends".to_string()];

        let mut drummer = musician(3, "Batuque Paulista", "São Paulo", "SP", 150, 4.5);
        drummer.instruments = vec!["drums".to_string()];
        drummer.genres = vec!["rock".to_string()];

        InMemoryListing::new(vec![sanfoneiro, guitarist, drummer])
    }

    fn query(filters: SearchFilters, sort_by: SortKey, page: u32, page_size: u32) -> ListingQuery {
        ListingQuery {
            generation: 1,
            filters,
            sort_by,
            page: Page::from(page),
            page_size,
        }
    }

    fn ids(page: &ListingPage) -> Vec<u64> {
        page.musicians.iter().map(|m| m.id).collect()
    }

    fn filtered(patch: FiltersPatch) -> SearchFilters {
        let mut filters = SearchFilters::default();
        filters.merge(patch);
        filters
    }

    #[test]
    fn rating_sort_breaks_ties_by_id() {
        let page = catalogue()
            .search(&query(SearchFilters::default(), SortKey::Rating, 1, 10))
            .unwrap();
        assert_eq!(ids(&page), vec![1, 2, 3]);
        assert_eq!(page.pagination.total, 3);
        assert_eq!(page.pagination.total_pages, 1);
    }

    #[test]
    fn price_sorts() {
        let backend = catalogue();
        let low = backend
            .search(&query(SearchFilters::default(), SortKey::PriceLow, 1, 10))
            .unwrap();
        let high = backend
            .search(&query(SearchFilters::default(), SortKey::PriceHigh, 1, 10))
            .unwrap();
        assert_eq!(ids(&low), vec![3, 1, 2]);
        assert_eq!(ids(&high), vec![2, 1, 3]);
    }

    #[test]
    fn newest_sort_uses_registration_time() {
        let page = catalogue()
            .search(&query(SearchFilters::default(), SortKey::Newest, 1, 10))
            .unwrap();
        assert_eq!(ids(&page), vec![3, 2, 1]);
    }

    #[test]
    fn state_and_city_filters() {
        let backend = catalogue();
        let pe = backend
            .search(&query(filtered(FiltersPatch::default().state("PE")), SortKey::Rating, 1, 10))
            .unwrap();
        assert_eq!(ids(&pe), vec![1, 2]);

        let recife = backend
            .search(&query(filtered(FiltersPatch::default().city("recife")), SortKey::Rating, 1, 10))
            .unwrap();
        assert_eq!(ids(&recife), vec![2]);
    }

    #[test]
    fn price_range_and_rating() {
        let filters = filtered(FiltersPatch::default().price_min("200").price_max("300").rating("4.8"));
        let page = catalogue().search(&query(filters, SortKey::Rating, 1, 10)).unwrap();
        assert_eq!(ids(&page), vec![1]);
    }

    #[test]
    fn unparseable_numbers_are_ignored() {
        let filters = filtered(FiltersPatch::default().price_min("cheap"));
        let page = catalogue().search(&query(filters, SortKey::Rating, 1, 10)).unwrap();
        assert_eq!(page.pagination.total, 3);
    }

    #[test]
    fn booked_date_excludes_musician() {
        let filters = filtered(FiltersPatch::default().date("2026-06-24"));
        let page = catalogue().search(&query(filters, SortKey::Rating, 1, 10)).unwrap();
        assert_eq!(ids(&page), vec![2, 3]);
    }

    #[test]
    fn instruments_match_any_availability_matches_all() {
        let backend = catalogue();
        let any = filtered(FiltersPatch::default().instruments(ValueSet::from_values(["drums", "sanfona"])));
        assert_eq!(ids(&backend.search(&query(any, SortKey::Rating, 1, 10)).unwrap()), vec![1, 3]);

        let all = filtered(FiltersPatch::default().availability(ValueSet::from_values(["weekends", "travel"])));
        assert_eq!(ids(&backend.search(&query(all, SortKey::Rating, 1, 10)).unwrap()), vec![1]);
    }

    #[test]
    fn free_text_matches_tags() {
        let filters = filtered(FiltersPatch::default().search("choro"));
        let page = catalogue().search(&query(filters, SortKey::Rating, 1, 10)).unwrap();
        assert_eq!(ids(&page), vec![2]);
    }

    #[test]
    fn pages_past_the_end_are_empty() {
        let page = catalogue()
            .search(&query(SearchFilters::default(), SortKey::Rating, 3, 2))
            .unwrap();
        assert!(page.musicians.is_empty());
        assert_eq!(page.pagination.total_pages, 2);
        assert!(page.pagination.is_out_of_range());
    }

    #[test]
    fn zero_page_size_is_rejected() {
        let result = catalogue().search(&query(SearchFilters::default(), SortKey::Rating, 1, 0));
        assert!(matches!(result, Err(SearchError::Listing(_))));
    }

    #[test]
    fn builtin_catalogue_parses() {
        let backend = InMemoryListing::builtin().unwrap();
        assert!(!backend.is_empty());
    }

    #[test]
    fn unknown_version_is_rejected() {
        let result = InMemoryListing::from_json(r#"{"version": 2, "musicians": []}"#);
        assert!(matches!(result, Err(SearchError::Listing(_))));
    }
}
