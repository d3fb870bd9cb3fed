//! Application layer coordinating the store, the controller and the host.
//!
//! ```text
//! URL ──Mount──▶ Controller ──setters──▶ Store ──search()──▶ PostToWorker
//!                    │  ▲                  ▲                      │
//!              ReplaceUrl │ TimerFired      └──── WorkerResponse ──┘
//!                    ▼  │
//!                  Host runtime
//! ```
//!
//! # Modules
//!
//! - [`actions`]: Side effect commands emitted by the event handler
//! - [`controller`]: Hydration, debounce and URL synchronization
//! - [`handler`]: Event processing entry point
//! - [`modes`]: Controller lifecycle
//! - [`store`]: Search state container with request generations

pub mod actions;
pub mod controller;
pub mod handler;
pub mod modes;
pub mod store;

pub use actions::Action;
pub use controller::{SearchController, DEFAULT_DEBOUNCE};
pub use handler::{handle_event, Event};
pub use modes::Lifecycle;
pub use store::SearchStore;
