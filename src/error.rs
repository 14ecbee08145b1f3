//! Error types for the Kensaku library.
//!
//! All failures are represented by the [`KensakuError`] enum. Errors raised
//! by an underlying postings source are propagated verbatim up through every
//! composing searcher; errors raised while closing a searcher tree are
//! aggregated so that every child still gets a chance to release resources.

use std::io;

use thiserror::Error;

/// The main error type for Kensaku operations.
#[derive(Error, Debug)]
pub enum KensakuError {
    /// I/O errors from an underlying postings source or document store.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Index-related errors (corrupted postings, decoding failures).
    #[error("Index error: {0}")]
    Index(String),

    /// Query-related errors (invalid searcher construction).
    #[error("Query error: {0}")]
    Query(String),

    /// Search-execution errors.
    #[error("Search error: {0}")]
    Search(String),

    /// One or more close errors collected while tearing down a searcher tree.
    #[error("Close error: {0}")]
    CloseAggregate(String),

    /// JSON serialization/deserialization errors.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error for other cases.
    #[error("Error: {0}")]
    Other(String),

    /// Generic anyhow error.
    #[error("Anyhow error: {0}")]
    Anyhow(#[from] anyhow::Error),
}

/// Result type alias for operations that may fail with KensakuError.
pub type Result<T> = std::result::Result<T, KensakuError>;

impl KensakuError {
    /// Create a new index error.
    pub fn index<S: Into<String>>(msg: S) -> Self {
        KensakuError::Index(msg.into())
    }

    /// Create a new query error.
    pub fn query<S: Into<String>>(msg: S) -> Self {
        KensakuError::Query(msg.into())
    }

    /// Create a new search error.
    pub fn search<S: Into<String>>(msg: S) -> Self {
        KensakuError::Search(msg.into())
    }

    /// Create a new generic error.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        KensakuError::Other(msg.into())
    }

    /// Collapse the errors collected while closing a searcher tree into a
    /// single aggregate error. Returns `Ok(())` when the list is empty.
    pub fn close_aggregate(errors: Vec<KensakuError>) -> Result<()> {
        if errors.is_empty() {
            return Ok(());
        }
        let joined = errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ");
        Err(KensakuError::CloseAggregate(joined))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_construction() {
        let error = KensakuError::index("Test index error");
        assert_eq!(error.to_string(), "Index error: Test index error");

        let error = KensakuError::query("Test query error");
        assert_eq!(error.to_string(), "Query error: Test query error");

        let error = KensakuError::search("Test search error");
        assert_eq!(error.to_string(), "Search error: Test search error");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let kensaku_error = KensakuError::from(io_error);

        match kensaku_error {
            KensakuError::Io(_) => {} // Expected
            _ => panic!("Expected IO error variant"),
        }
    }

    #[test]
    fn test_close_aggregate() {
        assert!(KensakuError::close_aggregate(vec![]).is_ok());

        let errors = vec![
            KensakuError::index("cursor one"),
            KensakuError::index("cursor two"),
        ];
        let aggregated = KensakuError::close_aggregate(errors).unwrap_err();
        let msg = aggregated.to_string();
        assert!(msg.contains("cursor one"));
        assert!(msg.contains("cursor two"));
    }
}
