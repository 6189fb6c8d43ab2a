//! Types used by the ledger query crates.
//!
//! These are low-level types shared between the backends and the RPC layer:
//! account and object identifiers, the keylet functions that derive object
//! addresses, the owner directory page record, and the pagination cursor
//! handed back to clients.

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

mod account;
pub use account::{AccountId, AddressError};

mod cursor;
pub use cursor::{AccountCursor, MALFORMED_CURSOR, MalformedCursor};

mod directory;
pub use directory::DirectoryPage;

mod error;
pub use error::DeserError;

pub mod keylet;

pub use alloy::primitives::{B256, Bytes};

/// 256-bit address of a ledger object inside the backend.
pub type ObjectKey = B256;

/// Raw serialized ledger object, as stored by the backend.
pub type Blob = Bytes;

/// Ledger index. Every read is made against the state as of one sequence.
pub type LedgerSequence = u32;
