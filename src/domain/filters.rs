//! Filter value object and the small enumerations that travel with it.
//!
//! [`SearchFilters`] is the structured form of everything a visitor can narrow the
//! musician listing by. Absent and empty values mean the same thing ("no filter"),
//! so every scalar is a plain `String` where `""` is the absent state. The state
//! code additionally uses the sentinel [`ALL_STATES`].
//!
//! Multi-valued dimensions use [`ValueSet`]: an insertion-ordered sequence with
//! uniqueness enforced and order-insensitive equality.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Sentinel state code meaning "any state".
pub const ALL_STATES: &str = "all";

/// Insertion-ordered set of trimmed, non-empty strings.
///
/// Equality ignores order: `["rock", "pop"] == ["pop", "rock"]`. Insertion order
/// is still kept so that values read from a URL are reported back in the order
/// the visitor wrote them.
///
/// # Examples
///
/// ```
/// use musician_search::domain::ValueSet;
///
/// let set = ValueSet::from_values([" rock", "pop", "rock", ""]);
/// assert_eq!(set.as_slice(), ["rock", "pop"]);
/// assert_eq!(set, ValueSet::from_values(["pop", "rock"]));
/// ```
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct ValueSet {
    values: Vec<String>,
    index: HashSet<String>,
}

impl ValueSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a set from arbitrary values, trimming each and dropping empty
    /// strings and duplicates.
    pub fn from_values<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self::new();
        for value in values {
            set.insert(value.as_ref());
        }
        set
    }

    /// Inserts a value, returning `false` if it was empty after trimming or
    /// already present.
    pub fn insert(&mut self, value: &str) -> bool {
        let value = value.trim();
        if value.is_empty() || !self.index.insert(value.to_string()) {
            return false;
        }
        self.values.push(value.to_string());
        true
    }

    #[must_use]
    pub fn contains(&self, value: &str) -> bool {
        self.index.contains(value)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.values.iter().map(String::as_str)
    }

    /// Values in insertion order.
    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.values
    }

    /// Values in lexicographic order, the canonical order used for URLs.
    #[must_use]
    pub fn sorted(&self) -> Vec<&str> {
        let mut values: Vec<&str> = self.iter().collect();
        values.sort_unstable();
        values
    }
}

impl fmt::Debug for ValueSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(&self.values).finish()
    }
}

impl PartialEq for ValueSet {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index
    }
}

impl Eq for ValueSet {}

impl From<Vec<String>> for ValueSet {
    fn from(values: Vec<String>) -> Self {
        Self::from_values(values)
    }
}

impl From<ValueSet> for Vec<String> {
    fn from(set: ValueSet) -> Self {
        set.values
    }
}

impl<'a> FromIterator<&'a str> for ValueSet {
    fn from_iter<T: IntoIterator<Item = &'a str>>(iter: T) -> Self {
        Self::from_values(iter)
    }
}

/// Ordering applied to the listing.
///
/// Unknown values collapse to the default, [`SortKey::Rating`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    /// Highest rated first.
    #[default]
    Rating,
    /// Cheapest hourly price first.
    PriceLow,
    /// Most expensive hourly price first.
    PriceHigh,
    /// Most recently registered first.
    Newest,
}

impl SortKey {
    /// Every accepted sort key.
    pub const ALL: [Self; 4] = [Self::Rating, Self::PriceLow, Self::PriceHigh, Self::Newest];

    /// Wire form used in the `sortBy` query parameter.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Rating => "rating",
            Self::PriceLow => "price-low",
            Self::PriceHigh => "price-high",
            Self::Newest => "newest",
        }
    }

    /// Reads a sort key from its wire form; anything unrecognized is `Rating`.
    ///
    /// ```
    /// use musician_search::domain::SortKey;
    ///
    /// assert_eq!(SortKey::from_param("price-high"), SortKey::PriceHigh);
    /// assert_eq!(SortKey::from_param("cheapest"), SortKey::Rating);
    /// ```
    #[must_use]
    pub fn from_param(value: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|key| key.as_str() == value)
            .unwrap_or_default()
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One-based page number.
///
/// Construction never fails: zero, negative, overflowing or non-numeric input
/// collapses to [`Page::FIRST`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "u32", into = "u32")]
pub struct Page(u32);

impl Page {
    pub const FIRST: Self = Self(1);

    /// Builds a page from any integer, collapsing invalid values to 1.
    ///
    /// ```
    /// use musician_search::domain::Page;
    ///
    /// assert_eq!(Page::new(3).get(), 3);
    /// assert_eq!(Page::new(0), Page::FIRST);
    /// assert_eq!(Page::new(-7), Page::FIRST);
    /// ```
    #[must_use]
    pub fn new(value: i64) -> Self {
        u32::try_from(value)
            .ok()
            .filter(|page| *page >= 1)
            .map_or(Self::FIRST, Self)
    }

    /// Parses the `page` query parameter. Only plain integers are accepted.
    #[must_use]
    pub fn from_param(value: &str) -> Self {
        value.parse::<i64>().map_or(Self::FIRST, Self::new)
    }

    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }

    #[must_use]
    pub const fn is_first(self) -> bool {
        self.0 == 1
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::FIRST
    }
}

impl From<u32> for Page {
    fn from(value: u32) -> Self {
        Self::new(i64::from(value))
    }
}

impl From<Page> for u32 {
    fn from(page: Page) -> Self {
        page.0
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Result presentation mode. Not part of the URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Grid,
    List,
}

impl ViewMode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Grid => "grid",
            Self::List => "list",
        }
    }

    /// Unknown values fall back to [`ViewMode::Grid`].
    #[must_use]
    pub fn from_param(value: &str) -> Self {
        if value.eq_ignore_ascii_case("list") {
            Self::List
        } else {
            Self::Grid
        }
    }
}

/// Structured filter state for the musician listing.
///
/// Every field is always populated; the default value of each field means
/// "not filtering on this dimension". Equality treats `""` and [`ALL_STATES`]
/// as the same state.
#[derive(Debug, Clone, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchFilters {
    /// Free-text query over names, bios, instruments and genres.
    pub search: String,
    pub city: String,
    /// Two-letter state code, or [`ALL_STATES`].
    pub state: String,
    /// Lower bound of the hourly price, kept as typed by the visitor.
    pub price_min: String,
    /// Upper bound of the hourly price, kept as typed by the visitor.
    pub price_max: String,
    /// Minimum rating threshold.
    pub rating: String,
    /// Date the visitor wants to book, `YYYY-MM-DD`.
    pub date: String,
    pub instruments: ValueSet,
    pub genres: ValueSet,
    /// Availability tags (weekends, evenings, travel, ...).
    pub availability: ValueSet,
}

impl Default for SearchFilters {
    fn default() -> Self {
        Self {
            search: String::new(),
            city: String::new(),
            state: ALL_STATES.to_string(),
            price_min: String::new(),
            price_max: String::new(),
            rating: String::new(),
            date: String::new(),
            instruments: ValueSet::new(),
            genres: ValueSet::new(),
            availability: ValueSet::new(),
        }
    }
}

impl PartialEq for SearchFilters {
    fn eq(&self, other: &Self) -> bool {
        self.search == other.search
            && self.city == other.city
            && self.state_filter() == other.state_filter()
            && self.price_min == other.price_min
            && self.price_max == other.price_max
            && self.rating == other.rating
            && self.date == other.date
            && self.instruments == other.instruments
            && self.genres == other.genres
            && self.availability == other.availability
    }
}

impl SearchFilters {
    /// Returns `true` when no dimension is being filtered on.
    #[must_use]
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }

    /// The state code to filter by, or `None` for "any state".
    #[must_use]
    pub fn state_filter(&self) -> Option<&str> {
        let state = self.state.as_str();
        (!state.is_empty() && state != ALL_STATES).then_some(state)
    }

    /// Shallow-merges a patch: every field present in the patch replaces the
    /// current value, every absent field is kept.
    pub fn merge(&mut self, patch: FiltersPatch) {
        let FiltersPatch {
            search,
            city,
            state,
            price_min,
            price_max,
            rating,
            date,
            instruments,
            genres,
            availability,
        } = patch;

        if let Some(search) = search {
            self.search = search;
        }
        if let Some(city) = city {
            self.city = city;
        }
        if let Some(state) = state {
            self.state = normalize_state(state);
        }
        if let Some(price_min) = price_min {
            self.price_min = price_min;
        }
        if let Some(price_max) = price_max {
            self.price_max = price_max;
        }
        if let Some(rating) = rating {
            self.rating = rating;
        }
        if let Some(date) = date {
            self.date = date;
        }
        if let Some(instruments) = instruments {
            self.instruments = instruments;
        }
        if let Some(genres) = genres {
            self.genres = genres;
        }
        if let Some(availability) = availability {
            self.availability = availability;
        }
    }
}

/// Maps the empty state code onto the sentinel so both spellings of
/// "any state" compare equal.
pub(crate) fn normalize_state(state: String) -> String {
    if state.trim().is_empty() {
        ALL_STATES.to_string()
    } else {
        state
    }
}

/// Partial update for [`SearchFilters`]; `None` fields are left untouched.
///
/// # Examples
///
/// ```
/// use musician_search::domain::{FiltersPatch, SearchFilters};
///
/// let mut filters = SearchFilters::default();
/// filters.merge(FiltersPatch::default().city("Recife").rating("4"));
/// assert_eq!(filters.city, "Recife");
/// assert_eq!(filters.rating, "4");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FiltersPatch {
    pub search: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub price_min: Option<String>,
    pub price_max: Option<String>,
    pub rating: Option<String>,
    pub date: Option<String>,
    pub instruments: Option<ValueSet>,
    pub genres: Option<ValueSet>,
    pub availability: Option<ValueSet>,
}

/// Generates chainable setters, one per patch field.
macro_rules! patch_setters {
    ($($field:ident: $ty:ty),* $(,)?) => {
        impl FiltersPatch {
            $(
                #[doc = concat!("Sets `", stringify!($field), "` in the patch.")]
                #[must_use]
                pub fn $field(mut self, value: impl Into<$ty>) -> Self {
                    self.$field = Some(value.into());
                    self
                }
            )*
        }
    };
}

patch_setters! {
    search: String,
    city: String,
    state: String,
    price_min: String,
    price_max: String,
    rating: String,
    date: String,
    instruments: ValueSet,
    genres: ValueSet,
    availability: ValueSet,
}

impl FiltersPatch {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.search.is_none()
            && self.city.is_none()
            && self.state.is_none()
            && self.price_min.is_none()
            && self.price_max.is_none()
            && self.rating.is_none()
            && self.date.is_none()
            && self.instruments.is_none()
            && self.genres.is_none()
            && self.availability.is_none()
    }
}

impl From<SearchFilters> for FiltersPatch {
    fn from(filters: SearchFilters) -> Self {
        Self {
            search: Some(filters.search),
            city: Some(filters.city),
            state: Some(filters.state),
            price_min: Some(filters.price_min),
            price_max: Some(filters.price_max),
            rating: Some(filters.rating),
            date: Some(filters.date),
            instruments: Some(filters.instruments),
            genres: Some(filters.genres),
            availability: Some(filters.availability),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_set_equality_ignores_order() {
        let a = ValueSet::from_values(["guitar", "drums"]);
        let b = ValueSet::from_values(["drums", "guitar"]);
        assert_eq!(a, b);
        assert_ne!(a, ValueSet::from_values(["guitar"]));
        assert_eq!(a.as_slice(), ["guitar", "drums"]);
        assert_eq!(b.sorted(), vec!["drums", "guitar"]);
    }

    #[test]
    fn value_set_deserializes_with_uniqueness() {
        let set: ValueSet = serde_json::from_str(r#"["rock", " rock ", "", "jazz"]"#).unwrap();
        assert_eq!(set.as_slice(), ["rock", "jazz"]);
    }

    #[test]
    fn page_collapses_invalid_input() {
        assert_eq!(Page::from_param("4").get(), 4);
        assert_eq!(Page::from_param("0"), Page::FIRST);
        assert_eq!(Page::from_param("-2"), Page::FIRST);
        assert_eq!(Page::from_param("2.5"), Page::FIRST);
        assert_eq!(Page::from_param("abc"), Page::FIRST);
        assert_eq!(Page::from_param(""), Page::FIRST);
        assert_eq!(Page::from_param("99999999999"), Page::FIRST);
    }

    #[test]
    fn sort_key_round_trips_wire_names() {
        for key in SortKey::ALL {
            assert_eq!(SortKey::from_param(key.as_str()), key);
        }
        assert_eq!(SortKey::from_param("PRICE-LOW"), SortKey::Rating);
    }

    #[test]
    fn merge_is_shallow() {
        let mut filters = SearchFilters {
            city: "Olinda".to_string(),
            genres: ValueSet::from_values(["frevo"]),
            ..SearchFilters::default()
        };
        filters.merge(FiltersPatch::default().search("sax"));
        assert_eq!(filters.city, "Olinda");
        assert_eq!(filters.search, "sax");
        assert_eq!(filters.genres, ValueSet::from_values(["frevo"]));
    }

    #[test]
    fn empty_state_means_all_states() {
        let mut filters = SearchFilters::default();
        filters.merge(FiltersPatch::default().state("PE"));
        assert_eq!(filters.state_filter(), Some("PE"));
        filters.merge(FiltersPatch::default().state(""));
        assert_eq!(filters.state, ALL_STATES);
        assert!(filters.is_default());
    }

    #[test]
    fn blank_state_equals_all_states() {
        let blank = SearchFilters {
            state: String::new(),
            ..SearchFilters::default()
        };
        assert!(blank.is_default());
        assert_eq!(blank, SearchFilters::default());

        let pe = SearchFilters {
            state: "PE".to_string(),
            ..SearchFilters::default()
        };
        assert_ne!(blank, pe);
    }

    #[test]
    fn value_set_handles_many_distinct_values() {
        let values: Vec<String> = (0..20_000).map(|i| format!("genre-{i}")).collect();
        let mut set = ValueSet::from_values(&values);
        assert_eq!(set.len(), 20_000);
        assert!(!set.insert("genre-19999"));
        assert!(set.contains("genre-0"));

        let reversed = ValueSet::from_values(values.iter().rev());
        assert_eq!(set, reversed);
        assert_eq!(set.as_slice()[0], "genre-0");
        assert_eq!(format!("{:?}", ValueSet::from_values(["a", "b"])), r#"["a", "b"]"#);
    }

    #[test]
    fn full_patch_replaces_everything() {
        let mut filters = SearchFilters {
            city: "Natal".to_string(),
            ..SearchFilters::default()
        };
        let replacement = SearchFilters {
            rating: "4".to_string(),
            ..SearchFilters::default()
        };
        filters.merge(FiltersPatch::from(replacement.clone()));
        assert_eq!(filters, replacement);
    }
}
