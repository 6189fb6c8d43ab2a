//! Error types for node startup.

use crate::config::ConfigError;
use ledger_backend_sql::SqlConnectorError;

/// Error type for building a node.
#[derive(Debug, thiserror::Error)]
pub enum NodeError {
    /// The configuration is incomplete or invalid.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    /// The SQL backend could not be opened.
    #[error("backend connection error: {0}")]
    Connect(#[from] SqlConnectorError),
}

/// Result type alias for node operations.
pub type NodeResult<T> = Result<T, NodeError>;
