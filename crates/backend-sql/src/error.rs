//! Error types for SQL ledger storage.

/// Errors that can occur in SQL ledger storage operations.
#[derive(Debug, thiserror::Error)]
pub enum SqlBackendError {
    /// A sqlx database error occurred.
    #[error("sqlx error: {0}")]
    Sqlx(#[from] sqlx::Error),

    /// A data conversion error occurred.
    #[error("conversion error: {0}")]
    Convert(String),
}

impl From<SqlBackendError> for ledger_backend::BackendError {
    fn from(error: SqlBackendError) -> Self {
        Self::Backend(Box::new(error))
    }
}
