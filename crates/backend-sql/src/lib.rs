//! SQL backend for ledger object storage.
//!
//! This crate provides a SQL implementation of the [`LedgerBackend`] trait,
//! storing every version of every ledger object as a row keyed by object
//! key and ledger sequence.
//!
//! # Supported Databases
//!
//! - **PostgreSQL** (feature `postgres`): Production-ready backend using
//!   connection pooling.
//! - **SQLite** (feature `sqlite`): Lightweight backend for testing and
//!   single-binary deployments.
//!
//! # Feature Flags
//!
//! - **`postgres`**: Enables the PostgreSQL driver.
//! - **`sqlite`**: Enables the SQLite driver.
//! - **`test-utils`**: Enables the SQLite driver and propagates
//!   `ledger-backend/test-utils` for conformance testing.
//!
//! [`LedgerBackend`]: ledger_backend::LedgerBackend

#![warn(
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    unreachable_pub,
    clippy::missing_const_for_fn,
    rustdoc::all
)]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![deny(unused_must_use, rust_2018_idioms)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod error;
pub use error::SqlBackendError;

mod backend;
pub use backend::{MAX_CONNECTIONS, SqlBackend};

mod connector;
pub use connector::{SqlConnector, SqlConnectorError};
