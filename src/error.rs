//! Error types for the coursearch library.
//!
//! All errors are represented by the [`SearchApiError`] enum. Only a missing
//! search engine is fatal to the two search entry points; the optional
//! classification steps log their errors and carry on.
//!
//! # Examples
//!
//! ```
//! use coursearch::error::{Result, SearchApiError};
//!
//! fn example_operation() -> Result<()> {
//!     Err(SearchApiError::config("COURSEWARE_INDEX_NAME is empty"))
//! }
//!
//! match example_operation() {
//!     Ok(_) => println!("Success"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::io;

use thiserror::Error;

/// The main error type for coursearch operations.
#[derive(Error, Debug)]
pub enum SearchApiError {
    /// No search engine is registered for the requested index.
    #[error("No search engine specified for index '{0}'")]
    NoSearchEngine(String),

    /// The query string is malformed (e.g. mismatched quotes).
    #[error("Query parse error: {0}")]
    QueryParse(String),

    /// Errors raised by a search engine backend.
    #[error("Search engine error: {0}")]
    Engine(String),

    /// Errors from the course metadata store.
    #[error("Catalog error: {0}")]
    Catalog(#[from] rusqlite::Error),

    /// Errors from a course classification backend.
    #[error("Classification error: {0}")]
    Classification(String),

    /// Invalid or unreadable configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O errors (config files, document files, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error for other cases
    #[error("Error: {0}")]
    Other(String),

    /// Error with context attached, shown with its cause chain
    #[error("{0:#}")]
    Anyhow(#[from] anyhow::Error),
}

/// Result type alias for operations that may fail with SearchApiError.
pub type Result<T> = std::result::Result<T, SearchApiError>;

impl SearchApiError {
    /// Create a new missing search engine error.
    pub fn no_search_engine<S: Into<String>>(index_name: S) -> Self {
        SearchApiError::NoSearchEngine(index_name.into())
    }

    /// Create a new query parse error.
    pub fn query_parse<S: Into<String>>(msg: S) -> Self {
        SearchApiError::QueryParse(msg.into())
    }

    /// Create a new engine error.
    pub fn engine<S: Into<String>>(msg: S) -> Self {
        SearchApiError::Engine(msg.into())
    }

    /// Create a new classification error.
    pub fn classification<S: Into<String>>(msg: S) -> Self {
        SearchApiError::Classification(msg.into())
    }

    /// Create a new configuration error.
    pub fn config<S: Into<String>>(msg: S) -> Self {
        SearchApiError::Config(msg.into())
    }

    /// Create a new generic error.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        SearchApiError::Other(msg.into())
    }

    /// Create a new invalid argument error.
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        SearchApiError::Other(format!("Invalid argument: {}", msg.into()))
    }

    /// Whether this error signals a missing search engine.
    pub fn is_no_search_engine(&self) -> bool {
        matches!(self, SearchApiError::NoSearchEngine(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_construction() {
        let error = SearchApiError::no_search_engine("courseware_index");
        assert_eq!(
            error.to_string(),
            "No search engine specified for index 'courseware_index'"
        );
        assert!(error.is_no_search_engine());

        let error = SearchApiError::query_parse("unbalanced quotes");
        assert_eq!(error.to_string(), "Query parse error: unbalanced quotes");
        assert!(!error.is_no_search_engine());

        let error = SearchApiError::invalid_argument("bad field");
        assert_eq!(error.to_string(), "Error: Invalid argument: bad field");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let error = SearchApiError::from(io_error);

        match error {
            SearchApiError::Io(_) => {} // Expected
            _ => panic!("Expected IO error variant"),
        }
    }

    #[test]
    fn test_json_error_conversion() {
        let json_error = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let error: SearchApiError = json_error.into();
        assert!(matches!(error, SearchApiError::Json(_)));
    }
}
