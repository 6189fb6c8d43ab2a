//! SQL ledger storage connector.

use crate::{SqlBackend, SqlBackendError};
use ledger_backend::BackendConnect;

/// Errors that can occur when initializing SQL connectors.
#[derive(Debug, thiserror::Error)]
pub enum SqlConnectorError {
    /// Missing environment variable.
    #[error("missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Ledger storage initialization failed.
    #[error("ledger storage initialization failed: {0}")]
    Init(#[from] SqlBackendError),
}

/// Connector for SQL ledger storage (PostgreSQL or SQLite).
///
/// Automatically detects the database type from the URL:
/// - URLs starting with `postgres://` or `postgresql://` use PostgreSQL
/// - URLs starting with `sqlite:` use SQLite
///
/// # Example
///
/// ```ignore
/// use ledger_backend_sql::SqlConnector;
///
/// let sqlite = SqlConnector::new("sqlite::memory:");
/// let backend = sqlite.connect().await?;
/// ```
#[derive(Debug, Clone)]
pub struct SqlConnector {
    url: String,
}

impl SqlConnector {
    /// Create a new SQL connector.
    ///
    /// The database type is detected from the URL prefix.
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    /// Get a reference to the connection URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Create a connector from environment variables.
    ///
    /// Reads the SQL URL from the specified environment variable.
    pub fn from_env(env_var: &'static str) -> Result<Self, SqlConnectorError> {
        let url = std::env::var(env_var).map_err(|_| SqlConnectorError::MissingEnvVar(env_var))?;
        Ok(Self::new(url))
    }
}

impl BackendConnect for SqlConnector {
    type Backend = SqlBackend;
    type Error = SqlConnectorError;

    async fn connect(&self) -> Result<Self::Backend, Self::Error> {
        Ok(SqlBackend::connect(&self.url).await?)
    }
}
