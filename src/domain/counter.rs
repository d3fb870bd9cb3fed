//! Active-filter badge count.

use super::filters::SearchFilters;

/// Counts how many filter dimensions are narrowing the listing.
///
/// Scalars count once each, the price range counts once even when both bounds
/// are set, and multi-valued dimensions count one per selected value.
///
/// # Examples
///
/// ```
/// use musician_search::domain::{count_active_filters, SearchFilters, ValueSet};
///
/// let filters = SearchFilters {
///     state: "SP".to_string(),
///     instruments: ValueSet::from_values(["guitar", "drums"]),
///     price_min: "100".to_string(),
///     ..SearchFilters::default()
/// };
/// assert_eq!(count_active_filters(&filters), 4);
/// ```
#[must_use]
pub fn count_active_filters(filters: &SearchFilters) -> usize {
    let flag = |active: bool| usize::from(active);

    flag(filters.state_filter().is_some())
        + flag(!filters.city.is_empty())
        + filters.instruments.len()
        + filters.genres.len()
        + flag(!filters.price_min.is_empty() || !filters.price_max.is_empty())
        + flag(!filters.rating.is_empty())
        + flag(!filters.date.is_empty())
        + filters.availability.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::filters::ValueSet;

    #[test]
    fn default_filters_count_zero() {
        assert_eq!(count_active_filters(&SearchFilters::default()), 0);
    }

    #[test]
    fn price_range_counts_once() {
        let filters = SearchFilters {
            price_min: "100".to_string(),
            price_max: "400".to_string(),
            ..SearchFilters::default()
        };
        assert_eq!(count_active_filters(&filters), 1);
    }

    #[test]
    fn free_text_is_not_a_badge() {
        let filters = SearchFilters {
            search: "violino".to_string(),
            ..SearchFilters::default()
        };
        assert_eq!(count_active_filters(&filters), 0);
    }

    #[test]
    fn every_dimension_contributes() {
        let filters = SearchFilters {
            search: "x".to_string(),
            city: "Recife".to_string(),
            state: "PE".to_string(),
            price_min: String::new(),
            price_max: "300".to_string(),
            rating: "4".to_string(),
            date: "2026-12-24".to_string(),
            instruments: ValueSet::from_values(["sanfona"]),
            genres: ValueSet::from_values(["forro", "baiao", "xote"]),
            availability: ValueSet::from_values(["weekends", "travel"]),
        };
        // state + city + 1 instrument + 3 genres + price + rating + date + 2 availability
        assert_eq!(count_active_filters(&filters), 11);
    }
}
