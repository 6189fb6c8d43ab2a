//! Async read interface over versioned ledger object stores.
//!
//! A ledger backend holds every version of every ledger object, keyed by
//! object key and the ledger sequence at which the version was written. A
//! read "at sequence `S`" sees the newest version written at or before `S`;
//! an empty version marks a deletion and reads as absent.
//!
//! # Architecture
//!
//! The backend layer uses a task-based architecture:
//!
//! - [`LedgerBackend`] trait defines the read interface backends implement
//! - [`BackendTask`] processes requests from a channel, with an LRU cache
//! - [`BackendHandle`] provides an ergonomic, cloneable API for sending
//!   requests, and itself implements [`LedgerBackend`]
//!
//! # Example
//!
//! ```ignore
//! use tokio_util::sync::CancellationToken;
//! use ledger_backend::{BackendTask, mem::MemBackend};
//!
//! let cancel = CancellationToken::new();
//! let handle = BackendTask::spawn(MemBackend::new(), cancel);
//!
//! let blob = handle.fetch_ledger_object(key, 1000).await?;
//! ```

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

mod connect;
pub use connect::BackendConnect;

mod error;
pub use error::{BackendError, BackendResult};

mod request;
pub use request::{BackendRequest, Responder};

mod traits;
pub use traits::{LedgerBackend, ObjectLoader};

/// Task module containing the backend task runner and handle.
pub mod task;
pub use task::{BackendHandle, BackendTask};

/// Conformance tests for ledger backends.
#[cfg(any(test, feature = "test-utils"))]
pub mod conformance;

#[cfg(any(test, feature = "in-memory"))]
pub mod mem;
