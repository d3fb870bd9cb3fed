//! Domain layer for the musician search core.
//!
//! This module contains the value types the rest of the crate is built on,
//! independent of URLs, timers or the listing backend.
//!
//! # Organization
//!
//! - [`error`]: Error types and result aliases
//! - [`filters`]: Filter value object, sort key, page and view mode
//! - [`counter`]: Active-filter badge count
//! - [`musician`]: Musician summaries and pagination metadata
//!
//! # Examples
//!
//! ```
//! use musician_search::domain::{count_active_filters, SearchFilters, ValueSet};
//!
//! let filters = SearchFilters {
//!     city: "Recife".to_string(),
//!     genres: ValueSet::from_values(["forro", "frevo"]),
//!     ..SearchFilters::default()
//! };
//! assert_eq!(count_active_filters(&filters), 3);
//! ```

pub mod counter;
pub mod error;
pub mod filters;
pub mod musician;

pub use counter::count_active_filters;
pub use error::{Result, SearchError};
pub use filters::{FiltersPatch, Page, SearchFilters, SortKey, ValueSet, ViewMode, ALL_STATES};
pub use musician::{ListingPage, Musician, Pagination};
