//! Listing backend abstraction.
//!
//! This module defines the [`ListingBackend`] trait, the narrow contract of the
//! remote musician listing endpoint: one query in, one page of summaries out.
//! The search store never talks to a backend directly; queries travel through
//! the worker bridge so the host decides where and when they run.

use crate::domain::error::Result;
use crate::domain::{ListingPage, Page, SearchFilters, SortKey};
use serde::{Deserialize, Serialize};

/// A single listing request as issued by the search store.
///
/// `generation` is stamped by the store and echoed back with the response so
/// that only the answer to the most recent request is applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingQuery {
    pub generation: u64,
    pub filters: SearchFilters,
    pub sort_by: SortKey,
    pub page: Page,
    pub page_size: u32,
}

/// Abstraction over listing endpoints.
///
/// # Implementations
///
/// - [`InMemoryListing`](crate::listing::InMemoryListing): JSON catalogue held in memory
///
/// # Examples
///
/// ```
/// use musician_search::listing::{InMemoryListing, ListingBackend, ListingQuery};
/// use musician_search::domain::{Page, SearchFilters, SortKey};
///
/// let backend = InMemoryListing::builtin()?;
/// let page = backend.search(&ListingQuery {
///     generation: 1,
///     filters: SearchFilters::default(),
///     sort_by: SortKey::Rating,
///     page: Page::FIRST,
///     page_size: 5,
/// })?;
/// assert!(page.musicians.len() <= 5);
/// # Ok::<(), musician_search::SearchError>(())
/// ```
pub trait ListingBackend: Send {
    /// Runs a query and returns the requested page.
    ///
    /// A page past the end is not an error: it comes back empty with the
    /// correct totals.
    ///
    /// # Errors
    ///
    /// Returns an error if the query cannot be answered at all (invalid page
    /// size, unreachable data source).
    fn search(&self, query: &ListingQuery) -> Result<ListingPage>;

    /// Number of musicians the backend knows about.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
