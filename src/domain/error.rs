//! Error types for the musician search core.
//!
//! This module defines the centralized error type [`SearchError`] and a type alias
//! [`Result`] used throughout the crate. Parsing URL parameters never produces an
//! error: malformed input collapses to defaults. Errors only come from the edges
//! (catalogue files, configuration, the worker bridge, the listing backend).

use thiserror::Error;

/// The main error type for musician search operations.
///
/// Most variants wrap a description of the failure. I/O and JSON failures convert
/// automatically through `#[from]`.
///
/// # Examples
///
/// ```
/// use musician_search::SearchError;
///
/// fn validate_page_size(size: u32) -> Result<u32, SearchError> {
///     if size == 0 {
///         return Err(SearchError::Config("page_size must be positive".to_string()));
///     }
///     Ok(size)
/// }
///
/// assert!(validate_page_size(0).is_err());
/// ```
#[derive(Debug, Error)]
pub enum SearchError {
    /// Filesystem or I/O operation failed.
    ///
    /// Wraps errors from reading catalogue or configuration files.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A JSON document could not be encoded or decoded.
    ///
    /// Occurs when the musician catalogue is malformed or a worker payload
    /// does not match the message protocol.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration is invalid or cannot be parsed.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The listing backend rejected or failed a query.
    #[error("Listing error: {0}")]
    Listing(String),

    /// Communication with the background worker failed.
    #[error("Worker communication error: {0}")]
    Worker(String),
}

/// A specialized `Result` type for musician search operations.
pub type Result<T> = std::result::Result<T, SearchError>;
