//! RPC error types and their JSON-RPC error objects.

use crate::owned::TraverseError;
use jsonrpsee::types::{ErrorObject, ErrorObjectOwned};
use ledger_backend::BackendError;
use std::borrow::Cow;
use tracing::error;

/// Result type for RPC handlers.
pub type RpcResult<T> = Result<T, RpcError>;

/// Numeric error codes reported to clients.
///
/// These are the small positive codes clients of ledger servers already
/// match on. Envelope failures (parse errors, invalid requests, unknown
/// methods) carry the JSON-RPC 2.0 codes and are answered by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// The account root does not exist in the requested ledger.
    ActNotFound,
    /// The requested ledger is not available.
    LgrNotFound,
    /// A parameter is missing or invalid.
    InvalidParams,
    /// The account is neither a classic address nor a hex account id.
    ActMalformed,
    /// The server failed while serving the request.
    Internal,
}

impl ErrorCode {
    /// The numeric code.
    pub const fn code(self) -> i32 {
        match self {
            Self::ActNotFound => 19,
            Self::LgrNotFound => 21,
            Self::InvalidParams => 31,
            Self::ActMalformed => 35,
            Self::Internal => 73,
        }
    }

    /// The short error token, carried as the error object's `data`.
    pub const fn token(self) -> &'static str {
        match self {
            Self::ActNotFound => "actNotFound",
            Self::LgrNotFound => "lgrNotFound",
            Self::InvalidParams => "invalidParams",
            Self::ActMalformed => "actMalformed",
            Self::Internal => "internal",
        }
    }
}

/// Errors returned by RPC methods.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RpcError {
    /// The account root does not exist in the requested ledger.
    #[error("Account not found.")]
    AccountNotFound,

    /// The account parameter could not be parsed.
    #[error("Account malformed.")]
    AccountMalformed,

    /// The requested ledger is not available.
    #[error("Ledger not found.")]
    LedgerNotFound,

    /// A parameter is missing or invalid. Carries the client message.
    #[error("{0}")]
    InvalidParams(Cow<'static, str>),

    /// The server failed. Details are logged, not returned.
    #[error("Internal error.")]
    Internal,
}

impl RpcError {
    /// The error code reported for this error.
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::AccountNotFound => ErrorCode::ActNotFound,
            Self::AccountMalformed => ErrorCode::ActMalformed,
            Self::LedgerNotFound => ErrorCode::LgrNotFound,
            Self::InvalidParams(_) => ErrorCode::InvalidParams,
            Self::Internal => ErrorCode::Internal,
        }
    }

    /// Create an invalid params error.
    pub fn invalid_params(message: impl Into<Cow<'static, str>>) -> Self {
        Self::InvalidParams(message.into())
    }
}

impl From<RpcError> for ErrorObjectOwned {
    fn from(err: RpcError) -> Self {
        let code = err.code();
        ErrorObject::owned(code.code(), err.to_string(), Some(code.token()))
    }
}

impl From<TraverseError> for RpcError {
    fn from(err: TraverseError) -> Self {
        match err {
            TraverseError::AccountNotFound => Self::AccountNotFound,
            TraverseError::MalformedCursor(err) => Self::invalid_params(err.to_string()),
            TraverseError::Corrupt(err) => {
                error!(%err, "corrupt directory page");
                Self::Internal
            }
            TraverseError::Backend(err) => err.into(),
        }
    }
}

impl From<BackendError> for RpcError {
    fn from(err: BackendError) -> Self {
        error!(%err, "backend read failed");
        Self::Internal
    }
}
