//! Owned-object queries over a versioned ledger store.
//!
//! This crate provides the owner directory traversal engine and a JSON-RPC
//! 2.0 server exposing it, backed by any [`LedgerBackend`].
//!
//! # Quick Start
//!
//! ```ignore
//! use ledger_backend::BackendTask;
//! use ledger_rpc::RpcRouter;
//!
//! let handle = BackendTask::spawn(backend, cancel_token);
//! let module = RpcRouter::new().build(handle)?;
//!
//! let server = jsonrpsee::server::Server::builder().build("127.0.0.1:51233").await?;
//! server.start(module).stopped().await;
//! ```
//!
//! # Supported Methods
//!
//! | Method | Response |
//! |--------|----------|
//! | `account_objects` | One page of an account's owned objects, plus a marker |
//! | `ledger_current` | The newest ledger sequence held by the backend |
//! | `server_info` | Server version and newest available ledger |
//!
//! # Pagination
//!
//! `account_objects` returns a `marker` while more objects remain. Passing
//! it back continues exactly where the previous page stopped. Markers are
//! plain text, `<64 hex digits>,<page>`, and carry all resume state; the
//! server keeps none. See [`owned`].
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

pub mod error;
pub use error::{ErrorCode, RpcError, RpcResult};

pub mod handlers;
pub use handlers::account::AccountObjectsLimits;

pub mod owned;
pub use owned::{TraverseError, traverse_owned_nodes};

pub mod router;
pub use router::{RpcContext, RpcRouter};

pub mod types;
