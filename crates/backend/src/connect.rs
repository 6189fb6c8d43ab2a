//! Connection traits for ledger backends.

use crate::LedgerBackend;

/// Connector trait for ledger backends.
///
/// Abstracts the connection/opening process, allowing different backends to
/// implement their own initialization logic.
pub trait BackendConnect {
    /// The backend type produced by this connector.
    type Backend: LedgerBackend;

    /// The error type returned by connection attempts.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Connect to the backend asynchronously.
    ///
    /// Async to support backends that require async initialization
    /// (like SQL connection pools).
    fn connect(
        &self,
    ) -> impl std::future::Future<Output = Result<Self::Backend, Self::Error>> + Send;
}
