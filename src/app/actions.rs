//! Actions representing side effects to be executed by the host runtime.
//!
//! The event handler never touches the browser history or the network itself.
//! It returns a `Vec<Action>` and the host executes them in order.
//!
//! # Example
//!
//! ```rust
//! use musician_search::app::Action;
//!
//! let actions = vec![Action::ReplaceUrl {
//!     query: "city=Recife".to_string(),
//! }];
//! assert_eq!(actions.len(), 1);
//! ```

use crate::worker::WorkerMessage;

/// Commands produced by the event handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Replaces the query string of the current URL without adding a history
    /// entry. The path is kept; `query` is canonical and has no leading `?`.
    ReplaceUrl { query: String },

    /// Sends a message to the listing worker.
    PostToWorker(WorkerMessage),
}
