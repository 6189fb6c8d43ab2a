//! Backend builder for programmatic and environment-based configuration.
//!
//! # Examples
//!
//! ## From Environment
//!
//! ```ignore
//! use ledger_node::builder::NodeBuilder;
//!
//! // LEDGER_BACKEND=sql LEDGER_SQL_URL=postgres://localhost/ledger
//! let handle = NodeBuilder::from_env()?.build().await?;
//! ```
//!
//! ## Programmatic
//!
//! ```ignore
//! use ledger_node::{builder::NodeBuilder, config::BackendMode};
//! use tokio_util::sync::CancellationToken;
//!
//! let cancel = CancellationToken::new();
//! let handle = NodeBuilder::new()
//!     .mode(BackendMode::Sql)
//!     .sql_url("sqlite::memory:")
//!     .cancel_token(cancel)
//!     .build()
//!     .await?;
//! ```

use crate::{
    EitherBackend, NodeResult,
    config::{BackendMode, ConfigError, DEFAULT_CACHE_SIZE, NodeConfig},
};
use ledger_backend::{BackendConnect, BackendHandle, BackendTask, mem::MemBackend};
use ledger_backend_sql::SqlConnector;
use std::num::NonZeroUsize;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Builder for the node's backend.
///
/// Opens the configured backend and spawns the [`BackendTask`] serving it.
#[derive(Debug)]
pub struct NodeBuilder {
    mode: Option<BackendMode>,
    sql_url: Option<String>,
    cache_size: NonZeroUsize,
    cancel_token: Option<CancellationToken>,
}

impl Default for NodeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeBuilder {
    /// Create a new builder.
    pub const fn new() -> Self {
        Self { mode: None, sql_url: None, cache_size: DEFAULT_CACHE_SIZE, cancel_token: None }
    }

    /// Create a builder from a loaded configuration.
    pub fn from_config(config: &NodeConfig) -> Self {
        let mut builder = Self::new().mode(config.mode).cache_size(config.cache_size);
        if let Some(url) = &config.sql_url {
            builder = builder.sql_url(url.clone());
        }
        builder
    }

    /// Create a builder from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if required environment variables are missing or
    /// invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        NodeConfig::from_env().map(|config| Self::from_config(&config))
    }

    /// Set the backend mode.
    #[must_use]
    pub const fn mode(mut self, mode: BackendMode) -> Self {
        self.mode = Some(mode);
        self
    }

    /// Set the SQL connection URL.
    #[must_use]
    pub fn sql_url(mut self, url: impl Into<String>) -> Self {
        self.sql_url = Some(url.into());
        self
    }

    /// Set the object cache capacity.
    #[must_use]
    pub const fn cache_size(mut self, cache_size: NonZeroUsize) -> Self {
        self.cache_size = cache_size;
        self
    }

    /// Set the cancellation token for the backend task.
    ///
    /// If not set, a new token is created.
    #[must_use]
    pub fn cancel_token(mut self, token: CancellationToken) -> Self {
        self.cancel_token = Some(token);
        self
    }

    /// Open the configured backend.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is incomplete or the SQL
    /// backend cannot be opened.
    pub async fn open_backend(&self) -> NodeResult<EitherBackend> {
        let backend = match self.mode.ok_or(ConfigError::MissingMode)? {
            BackendMode::Memory => EitherBackend::Memory(MemBackend::new()),
            BackendMode::Sql => {
                let url = self.sql_url.as_deref().ok_or(ConfigError::MissingSqlUrl)?;
                EitherBackend::Sql(SqlConnector::new(url).connect().await?)
            }
        };
        Ok(backend)
    }

    /// Open the backend and spawn the task serving it.
    ///
    /// The task runs until the cancellation token fires.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is incomplete or the SQL
    /// backend cannot be opened.
    pub async fn build(self) -> NodeResult<BackendHandle> {
        let backend = self.open_backend().await?;
        info!(mode = ?self.mode, cache_size = self.cache_size.get(), "ledger backend opened");

        let cancel_token = self.cancel_token.unwrap_or_default();
        let (task, handle) = BackendTask::with_cache_capacity(backend, cancel_token, self.cache_size);
        tokio::spawn(task.run());
        Ok(handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NodeError;
    use ledger_backend::LedgerBackend;

    #[tokio::test]
    async fn builder_requires_mode() {
        let err = NodeBuilder::new().build().await.unwrap_err();
        assert!(matches!(err, NodeError::Config(ConfigError::MissingMode)));
    }

    #[tokio::test]
    async fn sql_mode_requires_url() {
        let err = NodeBuilder::new().mode(BackendMode::Sql).build().await.unwrap_err();
        assert!(matches!(err, NodeError::Config(ConfigError::MissingSqlUrl)));
    }

    #[tokio::test]
    async fn builds_memory_backend() {
        let cancel = CancellationToken::new();
        let handle = NodeBuilder::new()
            .mode(BackendMode::Memory)
            .cancel_token(cancel.clone())
            .build()
            .await
            .unwrap();
        assert!(handle.latest_sequence().await.unwrap().is_none());
        cancel.cancel();
    }

    #[tokio::test]
    async fn builds_sqlite_backend() {
        let cancel = CancellationToken::new();
        let config = NodeConfig {
            mode: BackendMode::Sql,
            sql_url: Some("sqlite::memory:".to_owned()),
            rpc_addr: crate::config::DEFAULT_RPC_ADDR,
            cache_size: NonZeroUsize::MIN,
        };
        let handle =
            NodeBuilder::from_config(&config).cancel_token(cancel.clone()).build().await.unwrap();
        assert!(handle.latest_sequence().await.unwrap().is_none());
        cancel.cancel();
    }
}
