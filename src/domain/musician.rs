//! Musician summaries and pagination metadata returned by the listing.
//!
//! A [`Musician`] is the summary shape the listing endpoint returns for each
//! result card. [`ListingPage`] bundles one page of summaries with the
//! [`Pagination`] describing where that page sits in the full result set.

use serde::{Deserialize, Serialize};

/// Number of seconds in one day.
const SECONDS_PER_DAY: i64 = 86_400;

/// Number of seconds in thirty days, the "new on the platform" window.
const SECONDS_PER_MONTH: i64 = 30 * SECONDS_PER_DAY;

/// Summary of a bookable musician.
///
/// # Fields
///
/// - `price_per_hour`: hourly fee in whole currency units
/// - `rating`: average review score, 0.0 to 5.0
/// - `created_at`: Unix timestamp of registration, drives the "newest" sort
/// - `unavailable_dates`: `YYYY-MM-DD` dates already booked
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Musician {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub bio: String,
    pub city: String,
    pub state: String,
    #[serde(default)]
    pub instruments: Vec<String>,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub availability: Vec<String>,
    pub price_per_hour: u32,
    #[serde(default)]
    pub rating: f32,
    pub created_at: i64,
    #[serde(default)]
    pub unavailable_dates: Vec<String>,
}

impl Musician {
    /// Creates a musician registered now, with no tags and no reviews.
    ///
    /// ```
    /// use musician_search::domain::Musician;
    ///
    /// let musician = Musician::new(7, "Dona Ivone", "Rio de Janeiro", "RJ", 300);
    /// assert_eq!(musician.rating, 0.0);
    /// assert!(musician.instruments.is_empty());
    /// ```
    #[must_use]
    pub fn new(id: u64, name: &str, city: &str, state: &str, price_per_hour: u32) -> Self {
        Self {
            id,
            name: name.to_string(),
            bio: String::new(),
            city: city.to_string(),
            state: state.to_string(),
            instruments: Vec::new(),
            genres: Vec::new(),
            availability: Vec::new(),
            price_per_hour,
            rating: 0.0,
            created_at: chrono::Utc::now().timestamp(),
            unavailable_dates: Vec::new(),
        }
    }

    /// Short "member since" label for result cards, relative to `now`.
    ///
    /// - registered within 30 days: `"new"`
    /// - otherwise: `"Nd on the platform"`
    ///
    /// ```
    /// use musician_search::domain::Musician;
    ///
    /// let mut musician = Musician::new(1, "Hermeto", "Arapiraca", "AL", 900);
    /// let now = musician.created_at;
    /// assert_eq!(musician.tenure_label(now), "new");
    ///
    /// musician.created_at = now - 90 * 86_400;
    /// assert_eq!(musician.tenure_label(now), "90d on the platform");
    /// ```
    #[must_use]
    pub fn tenure_label(&self, now: i64) -> String {
        let age = (now - self.created_at).max(0);
        if age < SECONDS_PER_MONTH {
            "new".to_string()
        } else {
            format!("{}d on the platform", age / SECONDS_PER_DAY)
        }
    }
}

/// Position of a page within the full result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub page: u32,
    pub page_size: u32,
    pub total: u64,
    pub total_pages: u32,
}

impl Pagination {
    /// Computes `total_pages` from the total count and page size.
    ///
    /// ```
    /// use musician_search::domain::Pagination;
    ///
    /// assert_eq!(Pagination::new(1, 12, 25).total_pages, 3);
    /// assert_eq!(Pagination::new(1, 12, 0).total_pages, 0);
    /// ```
    #[must_use]
    pub fn new(page: u32, page_size: u32, total: u64) -> Self {
        let total_pages = if page_size == 0 {
            0
        } else {
            let size = u64::from(page_size);
            u32::try_from((total + size - 1) / size).unwrap_or(u32::MAX)
        };
        Self {
            page,
            page_size,
            total,
            total_pages,
        }
    }

    /// Whether `page` points past the last page of a non-empty result set.
    #[must_use]
    pub const fn is_out_of_range(&self) -> bool {
        self.total_pages > 0 && self.page > self.total_pages
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(1, 12, 0)
    }
}

/// One page of results plus its pagination metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListingPage {
    pub musicians: Vec<Musician>,
    pub pagination: Pagination,
}
