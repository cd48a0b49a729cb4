//! Error types for the docset library.
//!
//! All fallible operations return [`DocSetError`]. Failures here are
//! structural (a bad capacity, a corrupt encoding, a malformed input file),
//! never transient, so nothing in the crate retries.
//!
//! # Examples
//!
//! ```
//! use docset::error::{DocSetError, Result};
//!
//! fn example_operation() -> Result<()> {
//!     Err(DocSetError::invalid_argument("capacity too large"))
//! }
//!
//! match example_operation() {
//!     Ok(_) => println!("Success"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::io;

use thiserror::Error;

/// The main error type for docset operations.
#[derive(Error, Debug)]
pub enum DocSetError {
    /// I/O errors while reading or writing encoded bit sets or id files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// An argument outside the accepted domain (capacity, id list, CLI option).
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A checked bit position that cannot be addressed.
    #[error("Index out of bounds: {index} (limit {limit})")]
    IndexOutOfBounds { index: usize, limit: usize },

    /// An encoded bit set failed validation.
    #[error("Corrupt bit set: {0}")]
    Corrupt(String),

    /// JSON serialization errors (CLI output).
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for operations that may fail with DocSetError.
pub type Result<T> = std::result::Result<T, DocSetError>;

impl DocSetError {
    /// Create a new invalid argument error.
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        DocSetError::InvalidArgument(msg.into())
    }

    /// Create a new corrupt-encoding error.
    pub fn corrupt<S: Into<String>>(msg: S) -> Self {
        DocSetError::Corrupt(msg.into())
    }

    /// Create a new out-of-bounds error.
    pub fn out_of_bounds(index: usize, limit: usize) -> Self {
        DocSetError::IndexOutOfBounds { index, limit }
    }
}
