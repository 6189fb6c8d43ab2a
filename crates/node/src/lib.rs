//! Owned-object query server.
//!
//! This crate wires a ledger backend, the backend task and the JSON-RPC
//! router into a server, configured from the environment or the command
//! line. The `ledger-node` binary is a thin wrapper around it.
//!
//! # Example
//!
//! ```ignore
//! use ledger_node::builder::NodeBuilder;
//! use ledger_rpc::RpcRouter;
//!
//! let handle = NodeBuilder::from_env()?.build().await?;
//! let module = RpcRouter::new().build(handle)?;
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

mod error;
pub use error::{NodeError, NodeResult};

pub mod builder;

pub mod config;

mod either;
pub use either::EitherBackend;

// Used by the binary.
use anyhow as _;
use clap as _;
use jsonrpsee as _;
use ledger_rpc as _;
use tracing_subscriber as _;
