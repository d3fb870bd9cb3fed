//! Search store: filters, sort, pagination and the current result page.
//!
//! [`SearchStore`] is the single owner of search state. The controller mutates
//! it only through the setters below and never writes result data; results
//! arrive exclusively through [`SearchStore::complete`].
//!
//! # Request generations
//!
//! Every call to [`SearchStore::search`] stamps a new, strictly increasing
//! generation on the query it returns. A response is applied only if it
//! carries the latest generation, so a slow answer to an older query can never
//! overwrite the results of a newer one.
//!
//! # Failure
//!
//! A failed query sets `error` and leaves the previous `musicians` in place.

use crate::domain::{
    FiltersPatch, ListingPage, Musician, Page, Pagination, SearchFilters, SortKey, ViewMode,
};
use crate::listing::ListingQuery;

/// Central search state container.
#[derive(Debug, Clone)]
pub struct SearchStore {
    filters: SearchFilters,
    sort_by: SortKey,
    pagination: Pagination,
    view: ViewMode,
    musicians: Vec<Musician>,
    is_loading: bool,
    error: Option<String>,
    generation: u64,
}

impl SearchStore {
    /// Creates a store with default filters and the given page size.
    ///
    /// # Example
    ///
    /// ```rust
    /// use musician_search::app::SearchStore;
    ///
    /// let store = SearchStore::new(12);
    /// assert_eq!(store.page().get(), 1);
    /// assert!(store.musicians().is_empty());
    /// ```
    #[must_use]
    pub fn new(page_size: u32) -> Self {
        Self {
            filters: SearchFilters::default(),
            sort_by: SortKey::default(),
            pagination: Pagination::new(1, page_size, 0),
            view: ViewMode::default(),
            musicians: Vec::new(),
            is_loading: false,
            error: None,
            generation: 0,
        }
    }

    #[must_use]
    pub const fn filters(&self) -> &SearchFilters {
        &self.filters
    }

    #[must_use]
    pub const fn sort_by(&self) -> SortKey {
        self.sort_by
    }

    #[must_use]
    pub const fn pagination(&self) -> &Pagination {
        &self.pagination
    }

    /// Current page as requested, independent of whether results arrived.
    #[must_use]
    pub fn page(&self) -> Page {
        Page::from(self.pagination.page)
    }

    #[must_use]
    pub const fn view(&self) -> ViewMode {
        self.view
    }

    #[must_use]
    pub fn musicians(&self) -> &[Musician] {
        &self.musicians
    }

    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.is_loading
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Generation of the most recently issued search, 0 if none.
    #[must_use]
    pub const fn latest_generation(&self) -> u64 {
        self.generation
    }

    /// Shallow-merges `patch` into the current filters.
    pub fn set_filters(&mut self, patch: FiltersPatch) {
        self.filters.merge(patch);
    }

    /// Resets every filter to its default.
    pub fn clear_filters(&mut self) {
        self.filters = SearchFilters::default();
    }

    pub fn set_sort_by(&mut self, sort_by: SortKey) {
        self.sort_by = sort_by;
    }

    pub fn set_page(&mut self, page: Page) {
        self.pagination.page = page.get();
    }

    pub fn set_view(&mut self, view: ViewMode) {
        self.view = view;
    }

    /// Starts a search for the current filters, sort and page.
    ///
    /// Marks the store as loading and returns the query to deliver to the
    /// listing worker.
    pub fn search(&mut self) -> ListingQuery {
        self.generation += 1;
        self.is_loading = true;

        tracing::debug!(
            generation = self.generation,
            page = self.pagination.page,
            sort_by = %self.sort_by,
            "search issued"
        );

        ListingQuery {
            generation: self.generation,
            filters: self.filters.clone(),
            sort_by: self.sort_by,
            page: self.page(),
            page_size: self.pagination.page_size,
        }
    }

    /// Applies the outcome of a search.
    ///
    /// Returns `false` without touching any state if no search was issued yet
    /// or `generation` is not the latest one issued.
    pub fn complete(
        &mut self,
        generation: u64,
        outcome: std::result::Result<ListingPage, String>,
    ) -> bool {
        if self.generation == 0 {
            tracing::debug!(generation, "dropping response, no search issued");
            return false;
        }
        if generation != self.generation {
            tracing::debug!(
                generation,
                latest = self.generation,
                "dropping response for superseded search"
            );
            return false;
        }

        self.is_loading = false;
        match outcome {
            Ok(page) => {
                tracing::debug!(
                    generation,
                    returned = page.musicians.len(),
                    total = page.pagination.total,
                    "search results applied"
                );
                // The requested page stays authoritative; it may have moved
                // since this search was issued.
                self.musicians = page.musicians;
                self.pagination = Pagination {
                    page: self.pagination.page,
                    ..page.pagination
                };
                self.error = None;
            }
            Err(message) => {
                tracing::debug!(generation, error = %message, "search failed, keeping previous results");
                self.error = Some(message);
            }
        }
        true
    }
}

impl Default for SearchStore {
    fn default() -> Self {
        Self::new(Pagination::default().page_size)
    }
}
