//! URL query codec for the search state.
//!
//! - [`params`]: decoded, multi-value query parameter accessor
//! - [`codec`]: `parse` / `serialize` between query parameters and filters

pub mod codec;
pub mod params;

pub use codec::{parse, parse_patch, parse_query, serialize, serialize_state, SearchState};
pub use params::QueryParams;
