//! Parameter and response types for the RPC methods.
//!
//! Requests are decoded into these structs and results are serialized from
//! them. The JSON-RPC envelope itself is handled by the server.

use ledger_types::LedgerSequence;
use serde::{Deserialize, Serialize};

/// Ledger selector accepted by ledger-scoped methods.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum LedgerIndex {
    /// A specific ledger sequence.
    Sequence(LedgerSequence),
    /// `"validated"`, `"current"`, `"closed"`, or a decimal sequence.
    Named(String),
}

/// Parameters of `account_objects`.
#[derive(Debug, Clone, Deserialize)]
pub struct AccountObjectsParams {
    /// Classic address or 40-digit hex account id.
    pub account: String,
    /// Ledger to read. Latest when absent.
    #[serde(default)]
    pub ledger_index: Option<LedgerIndex>,
    /// Maximum objects to return.
    #[serde(default)]
    pub limit: Option<u32>,
    /// Marker returned by a previous call.
    #[serde(default)]
    pub marker: Option<String>,
}

/// Result of `account_objects`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountObjectsResponse {
    /// The account, as a classic address.
    pub account: String,
    /// The ledger that was read.
    pub ledger_index: LedgerSequence,
    /// Owned objects, as uppercase hex blobs, in directory order.
    pub account_objects: Vec<String>,
    /// The limit that was applied.
    pub limit: u32,
    /// Marker for the next call. Absent once the directory is exhausted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marker: Option<String>,
}

/// Result of `ledger_current`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LedgerCurrentResponse {
    /// The newest ledger sequence held by the backend.
    pub ledger_current_index: LedgerSequence,
}

/// The newest ledger available to queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ValidatedLedger {
    /// Its sequence.
    pub seq: LedgerSequence,
}

/// Server details reported by `server_info`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServerInfo {
    /// Server version.
    pub build_version: &'static str,
    /// Newest ledger available, if the backend holds any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validated_ledger: Option<ValidatedLedger>,
}

/// Result of `server_info`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServerInfoResponse {
    /// Server details.
    pub info: ServerInfo,
}
