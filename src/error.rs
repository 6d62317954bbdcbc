//! Error types for import-order.
//!
//! Every error is fatal for the unit (file) being analyzed; callers that
//! process many files get one `Result` per file.

use thiserror::Error;

/// Errors that can occur while analyzing or fixing one file.
#[derive(Debug, Error)]
pub enum OrderError {
    /// LCS diff of a claimed permutation disagreed on membership
    #[error("diff mismatch: number of additions ({added}) and deletions ({removed}) should be the same")]
    DiffMismatch {
        /// Elements only present in the target order
        added: usize,
        /// Elements only present in the original order
        removed: usize,
    },

    /// Target order is not a reordering of the original elements
    #[error("target sequence is not a permutation of the original ({original} vs {target} elements)")]
    NotAPermutation {
        /// Length of the original sequence
        original: usize,
        /// Length of the target sequence
        target: usize,
    },

    /// A delimiter token required to compute an edit range was not found
    #[error("missing delimiter: expected `{expected}` near offset {offset}")]
    MissingDelimiter {
        /// The delimiter that was expected
        expected: &'static str,
        /// Byte offset where the lookup started
        offset: usize,
    },

    /// Source text could not be scanned for import declarations
    #[error("parse error at offset {offset}: {message}")]
    Parse {
        /// Byte offset of the offending input
        offset: usize,
        /// What went wrong
        message: String,
    },

    /// The tree-sitter parser could not be set up or gave no tree
    #[error("tree-sitter error: {0}")]
    TreeSitter(String),

    /// A fix produced a range that cannot be applied to the source
    #[error("invalid edit: {0}")]
    InvalidEdit(String),
}

/// Result type alias for import-order operations.
pub type OrderResult<T> = Result<T, OrderError>;

impl OrderError {
    /// Create a parse error at `offset`.
    pub fn parse(offset: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            offset,
            message: message.into(),
        }
    }

    /// Create a missing-delimiter error.
    pub fn missing_delimiter(expected: &'static str, offset: usize) -> Self {
        Self::MissingDelimiter { expected, offset }
    }

    /// Create an invalid-edit error with a message.
    pub fn invalid_edit(msg: impl Into<String>) -> Self {
        Self::InvalidEdit(msg.into())
    }
}
