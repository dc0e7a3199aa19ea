//! Error types for the redocx analysis core.

use thiserror::Error;

/// Result type alias for redocx operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced by the analysis core.
///
/// The core treats data-quality problems (empty span lists, zero-area pages,
/// missing styles) as degeneracies handled with documented defaults, not
/// errors. The variants below cover per-item failures that a caller isolates
/// and skips — a malformed table must not abort the rest of the page.
#[derive(Error, Debug)]
pub enum Error {
    /// A raw table grid had no usable content after cleanup.
    #[error("empty table grid: {0}")]
    EmptyTable(String),

    /// An input value violated the extraction-layer contract.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}
