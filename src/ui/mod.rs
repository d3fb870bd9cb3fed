//! Presentation layer: display-ready view of the search page.
//!
//! ```text
//! SearchStore + Location → SearchViewModel::compute → Display
//! ```

pub mod viewmodel;

pub use viewmodel::{ResultCard, SearchViewModel};
