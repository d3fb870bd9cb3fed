//! Worker bridge between the search store and the listing backend.
//!
//! The store produces [`WorkerMessage`]s; the host delivers them to a
//! [`ListingWorker`] and feeds the [`WorkerResponse`]s back as events. Where
//! the worker actually runs (same thread, another thread, across a network
//! hop) is the host's decision.
//!
//! - `messages`: request/response protocol with trace context propagation
//! - `handler`: worker implementation over a listing backend

pub mod handler;
pub mod messages;

pub use handler::ListingWorker;
pub use messages::{TraceContext, WorkerMessage, WorkerResponse};
