//! Listing layer standing in for the remote musician listing endpoint.
//!
//! # Modules
//!
//! - `backend`: [`ListingBackend`] trait and the [`ListingQuery`] request shape
//! - `memory`: JSON catalogue held in memory with filtering, ranking and paging

pub mod backend;
pub mod memory;

pub use backend::{ListingBackend, ListingQuery};
pub use memory::InMemoryListing;
