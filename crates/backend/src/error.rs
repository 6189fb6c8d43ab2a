//! Error types for backend operations.

/// Result type alias for backend operations.
pub type BackendResult<T, E = BackendError> = Result<T, E>;

/// Error type for backend operations.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// An error occurred in the storage backend.
    #[error("Backend error: {0}")]
    Backend(#[from] Box<dyn core::error::Error + Send + Sync + 'static>),

    /// The backend task was cancelled, or shut down before answering.
    ///
    /// This is terminal for the request that observed it. Requests sent
    /// after the task has stopped fail the same way.
    #[error("Task cancelled")]
    Cancelled,
}

impl BackendError {
    /// Create a new backend error from any error type.
    pub fn backend<E>(error: E) -> Self
    where
        E: core::error::Error + Send + Sync + 'static,
    {
        Self::Backend(Box::new(error))
    }
}
