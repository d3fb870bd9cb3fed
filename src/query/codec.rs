//! Conversion between [`SearchFilters`] and the URL query string.
//!
//! Parsing is total: every input, however malformed, yields a fully populated
//! [`SearchState`]. Serializing produces the canonical query string: fields at
//! their default are omitted, multi-valued fields are emitted as repeated
//! parameters in lexicographic order, and the key order is fixed. Two states
//! that are equal by value therefore serialize to identical strings.
//!
//! Parsing accepts more than serializing emits: the `q` and `location` aliases,
//! and comma-joined multi-values (`genres=rock,pop`). Commas are always treated
//! as separators, so a single value cannot contain one.

use super::params::QueryParams;
use crate::domain::filters::{normalize_state, FiltersPatch, Page, SearchFilters, SortKey, ValueSet};
use url::form_urlencoded;

pub const SEARCH: &str = "search";
pub const SEARCH_ALIAS: &str = "q";
pub const CITY: &str = "city";
pub const CITY_ALIAS: &str = "location";
pub const STATE: &str = "state";
pub const PRICE_MIN: &str = "priceMin";
pub const PRICE_MAX: &str = "priceMax";
pub const RATING: &str = "rating";
pub const DATE: &str = "date";
pub const INSTRUMENTS: &str = "instruments";
pub const GENRES: &str = "genres";
pub const AVAILABILITY: &str = "availability";
pub const SORT_BY: &str = "sortBy";
pub const PAGE: &str = "page";

/// The complete URL-addressable search state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchState {
    pub filters: SearchFilters,
    pub sort_by: SortKey,
    pub page: Page,
}

/// Reads filters, sort and page from query parameters.
///
/// # Examples
///
/// ```
/// use musician_search::query::{parse, QueryParams};
/// use musician_search::domain::SortKey;
///
/// let state = parse(&QueryParams::parse("q=choro&location=Recife&sortBy=newest&page=x"));
/// assert_eq!(state.filters.search, "choro");
/// assert_eq!(state.filters.city, "Recife");
/// assert_eq!(state.sort_by, SortKey::Newest);
/// assert_eq!(state.page.get(), 1);
/// ```
#[must_use]
pub fn parse(params: &QueryParams) -> SearchState {
    let scalar = |key: &str| params.get(key).unwrap_or_default().to_string();

    let filters = SearchFilters {
        search: first_non_empty(params, &[SEARCH, SEARCH_ALIAS]),
        city: first_non_empty(params, &[CITY, CITY_ALIAS]),
        state: normalize_state(scalar(STATE)),
        price_min: scalar(PRICE_MIN),
        price_max: scalar(PRICE_MAX),
        rating: scalar(RATING),
        date: scalar(DATE),
        instruments: multi_value(params, INSTRUMENTS),
        genres: multi_value(params, GENRES),
        availability: multi_value(params, AVAILABILITY),
    };

    SearchState {
        filters,
        sort_by: params.get(SORT_BY).map_or_else(SortKey::default, SortKey::from_param),
        page: params.get(PAGE).map_or(Page::FIRST, Page::from_param),
    }
}

/// Convenience wrapper over [`parse`] for a raw query string.
#[must_use]
pub fn parse_query(query: &str) -> SearchState {
    parse(&QueryParams::parse(query))
}

/// Builds a patch from only the filter keys present in `params`.
///
/// Aliases are honored the same way [`parse`] honors them. Sort and page keys
/// are ignored.
#[must_use]
pub fn parse_patch(params: &QueryParams) -> FiltersPatch {
    let present = |keys: &[&str]| keys.iter().any(|key| params.contains(key));
    let state = parse(params);
    let filters = state.filters;

    FiltersPatch {
        search: present(&[SEARCH, SEARCH_ALIAS]).then_some(filters.search),
        city: present(&[CITY, CITY_ALIAS]).then_some(filters.city),
        state: present(&[STATE]).then_some(filters.state),
        price_min: present(&[PRICE_MIN]).then_some(filters.price_min),
        price_max: present(&[PRICE_MAX]).then_some(filters.price_max),
        rating: present(&[RATING]).then_some(filters.rating),
        date: present(&[DATE]).then_some(filters.date),
        instruments: present(&[INSTRUMENTS]).then_some(filters.instruments),
        genres: present(&[GENRES]).then_some(filters.genres),
        availability: present(&[AVAILABILITY]).then_some(filters.availability),
    }
}

/// Produces the canonical query string (without `?`) for a search state.
///
/// # Examples
///
/// ```
/// use musician_search::domain::{Page, SearchFilters, SortKey, ValueSet};
/// use musician_search::query::serialize;
///
/// assert_eq!(serialize(&SearchFilters::default(), SortKey::Rating, Page::FIRST), "");
///
/// let filters = SearchFilters {
///     city: "Belo Horizonte".to_string(),
///     genres: ValueSet::from_values(["rock", "blues"]),
///     ..SearchFilters::default()
/// };
/// assert_eq!(
///     serialize(&filters, SortKey::PriceLow, Page::new(2)),
///     "city=Belo+Horizonte&genres=blues&genres=rock&sortBy=price-low&page=2"
/// );
/// ```
#[must_use]
pub fn serialize(filters: &SearchFilters, sort_by: SortKey, page: Page) -> String {
    let mut out = form_urlencoded::Serializer::new(String::new());

    for (key, value) in [
        (SEARCH, filters.search.as_str()),
        (CITY, filters.city.as_str()),
        (STATE, filters.state_filter().unwrap_or_default()),
        (PRICE_MIN, filters.price_min.as_str()),
        (PRICE_MAX, filters.price_max.as_str()),
        (RATING, filters.rating.as_str()),
        (DATE, filters.date.as_str()),
    ] {
        if !value.is_empty() {
            out.append_pair(key, value);
        }
    }

    for (key, values) in [
        (INSTRUMENTS, &filters.instruments),
        (GENRES, &filters.genres),
        (AVAILABILITY, &filters.availability),
    ] {
        for value in values.sorted() {
            out.append_pair(key, value);
        }
    }

    if sort_by != SortKey::default() {
        out.append_pair(SORT_BY, sort_by.as_str());
    }
    if !page.is_first() {
        out.append_pair(PAGE, &page.to_string());
    }

    out.finish()
}

/// Serializes a [`SearchState`].
#[must_use]
pub fn serialize_state(state: &SearchState) -> String {
    serialize(&state.filters, state.sort_by, state.page)
}

fn first_non_empty(params: &QueryParams, keys: &[&str]) -> String {
    keys.iter()
        .filter_map(|key| params.get(key))
        .find(|value| !value.is_empty())
        .unwrap_or_default()
        .to_string()
}

fn multi_value(params: &QueryParams, key: &str) -> ValueSet {
    let mut values = ValueSet::new();
    for occurrence in params.get_all(key) {
        for piece in occurrence.split(',') {
            values.insert(piece);
        }
    }
    values
}
