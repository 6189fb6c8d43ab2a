//! RPC method handlers.
//!
//! Handlers are async functions that receive the [`RpcContext`] and typed
//! parameters, and return [`RpcResult`]s.
//!
//! # Module Organization
//!
//! - **Account queries** (`account`): `account_objects`
//! - **Server queries** (this module): `ledger_current`, `server_info`

pub mod account;

use crate::{
    error::{RpcError, RpcResult},
    router::RpcContext,
    types::{LedgerCurrentResponse, LedgerIndex, ServerInfo, ServerInfoResponse, ValidatedLedger},
};
use ledger_backend::LedgerBackend;
use ledger_types::LedgerSequence;

/// Version reported by `server_info`.
pub const BUILD_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Resolve a ledger selector against the newest ledger the backend holds.
///
/// An absent selector, `"validated"`, `"current"` and `"closed"` all mean
/// the newest ledger. A sequence newer than that is not found.
pub(crate) async fn resolve_ledger<B: LedgerBackend>(
    backend: &B,
    index: Option<&LedgerIndex>,
) -> RpcResult<LedgerSequence> {
    let latest = backend.latest_sequence().await?.ok_or(RpcError::LedgerNotFound)?;
    let requested = match index {
        None => return Ok(latest),
        Some(LedgerIndex::Sequence(sequence)) => *sequence,
        Some(LedgerIndex::Named(name)) => match name.as_str() {
            "validated" | "current" | "closed" => return Ok(latest),
            digits => digits
                .parse()
                .map_err(|_| RpcError::invalid_params("Invalid field 'ledger_index'."))?,
        },
    };
    if requested > latest {
        return Err(RpcError::LedgerNotFound);
    }
    Ok(requested)
}

/// Handler for `ledger_current`.
///
/// Returns the newest ledger sequence held by the backend.
pub async fn ledger_current<B: LedgerBackend>(
    ctx: &RpcContext<B>,
) -> RpcResult<LedgerCurrentResponse> {
    let ledger_current_index = resolve_ledger(&ctx.backend, None).await?;
    Ok(LedgerCurrentResponse { ledger_current_index })
}

/// Handler for `server_info`.
///
/// Never fails for lack of ledgers; `validated_ledger` is omitted instead.
pub async fn server_info<B: LedgerBackend>(ctx: &RpcContext<B>) -> RpcResult<ServerInfoResponse> {
    let validated_ledger = ctx.backend.latest_sequence().await?.map(|seq| ValidatedLedger { seq });
    Ok(ServerInfoResponse { info: ServerInfo { build_version: BUILD_VERSION, validated_ledger } })
}
