//! Node configuration types and environment parsing.
//!
//! # Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `LEDGER_BACKEND` | Backend mode (`memory`, `sql`) | required |
//! | `LEDGER_SQL_URL` | SQL connection string | required when `mode=sql` |
//! | `LEDGER_RPC_ADDR` | JSON-RPC listen address | `127.0.0.1:51233` |
//! | `LEDGER_CACHE_SIZE` | Object cache capacity | `1024` |
//!
//! # Example
//!
//! ```rust
//! use ledger_node::config::BackendMode;
//!
//! let mode: BackendMode = "sql".parse().unwrap();
//! assert_eq!(mode, BackendMode::Sql);
//! assert_eq!(mode.to_string(), "sql");
//! ```

use std::{
    env, fmt,
    net::{Ipv4Addr, SocketAddr, SocketAddrV4},
    num::NonZeroUsize,
    str::FromStr,
};
use thiserror::Error;

/// Environment variable name for backend mode selection.
pub const ENV_BACKEND: &str = "LEDGER_BACKEND";

/// Environment variable name for the SQL connection URL.
pub const ENV_SQL_URL: &str = "LEDGER_SQL_URL";

/// Environment variable name for the JSON-RPC listen address.
pub const ENV_RPC_ADDR: &str = "LEDGER_RPC_ADDR";

/// Environment variable name for the object cache capacity.
pub const ENV_CACHE_SIZE: &str = "LEDGER_CACHE_SIZE";

/// Default JSON-RPC listen address.
pub const DEFAULT_RPC_ADDR: SocketAddr =
    SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::LOCALHOST, 51233));

/// Default object cache capacity.
pub const DEFAULT_CACHE_SIZE: NonZeroUsize = match NonZeroUsize::new(1024) {
    Some(size) => size,
    None => unreachable!(),
};

/// Backend mode configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendMode {
    /// In-memory store. Starts empty; for development and tests.
    Memory,
    /// SQL store (PostgreSQL or SQLite).
    Sql,
}

impl BackendMode {
    /// Load the backend mode from the `LEDGER_BACKEND` environment variable.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingEnvVar`] if the environment variable is
    /// not set, or [`ConfigError::InvalidMode`] if it cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        let value = env::var(ENV_BACKEND).map_err(|_| ConfigError::MissingEnvVar(ENV_BACKEND))?;
        value.parse()
    }
}

impl FromStr for BackendMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "memory" => Ok(Self::Memory),
            "sql" => Ok(Self::Sql),
            _ => Err(ConfigError::InvalidMode(s.to_owned())),
        }
    }
}

impl fmt::Display for BackendMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Memory => write!(f, "memory"),
            Self::Sql => write!(f, "sql"),
        }
    }
}

/// Complete node configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeConfig {
    /// Backend mode.
    pub mode: BackendMode,
    /// SQL connection URL, required in [`BackendMode::Sql`].
    pub sql_url: Option<String>,
    /// JSON-RPC listen address.
    pub rpc_addr: SocketAddr,
    /// Object cache capacity.
    pub cache_size: NonZeroUsize,
}

impl NodeConfig {
    /// Load the configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if the mode is missing or invalid, if `sql` mode is
    /// selected without a URL, or if an optional variable is set but does
    /// not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mode = BackendMode::from_env()?;
        let sql_url = env::var(ENV_SQL_URL).ok();
        if mode == BackendMode::Sql && sql_url.is_none() {
            return Err(ConfigError::MissingSqlUrl);
        }

        Ok(Self {
            mode,
            sql_url,
            rpc_addr: parse_optional(ENV_RPC_ADDR)?.unwrap_or(DEFAULT_RPC_ADDR),
            cache_size: parse_optional(ENV_CACHE_SIZE)?.unwrap_or(DEFAULT_CACHE_SIZE),
        })
    }
}

/// Parse an optional environment variable.
fn parse_optional<T: FromStr>(env_var: &'static str) -> Result<Option<T>, ConfigError> {
    env::var(env_var)
        .ok()
        .map(|value| value.parse().map_err(|_| ConfigError::InvalidValue { env_var, value }))
        .transpose()
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Required environment variable is missing.
    #[error("missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Invalid backend mode string.
    #[error("invalid backend mode: {0} (expected: memory, sql)")]
    InvalidMode(String),

    /// No backend mode was configured.
    #[error("backend mode not configured")]
    MissingMode,

    /// `sql` mode was selected without a connection URL.
    #[error("missing SQL URL for mode sql: environment variable {ENV_SQL_URL} not set")]
    MissingSqlUrl,

    /// An environment variable is set but cannot be parsed.
    #[error("invalid value for {env_var}: {value}")]
    InvalidValue {
        /// The environment variable name.
        env_var: &'static str,
        /// The value found.
        value: String,
    },
}
