//! Errors produced by owner directory traversal.

use ledger_backend::BackendError;
use ledger_types::{DeserError, MalformedCursor};

/// Reasons a traversal fails.
///
/// A traversal either returns the cursor to resume from, or exactly one of
/// these. Conditions the walk absorbs (a missing start page or resume
/// point) are not errors and end the traversal with the terminal cursor.
#[derive(Debug, thiserror::Error)]
pub enum TraverseError {
    /// The account root does not exist at the requested sequence.
    #[error("Account not found.")]
    AccountNotFound,

    /// The client marker could not be parsed.
    #[error(transparent)]
    MalformedCursor(#[from] MalformedCursor),

    /// A directory page is stored but cannot be decoded.
    #[error("corrupt directory page: {0}")]
    Corrupt(#[from] DeserError),

    /// The backend failed. Never retried here.
    #[error("backend error: {0}")]
    Backend(#[from] BackendError),
}

/// Result type alias for traversal operations.
pub type TraverseResult<T> = Result<T, TraverseError>;
