//! Account handlers.

use crate::{
    error::{RpcError, RpcResult},
    handlers::resolve_ledger,
    owned::traverse_owned_nodes,
    router::RpcContext,
    types::{AccountObjectsParams, AccountObjectsResponse},
};
use alloy::primitives::hex;
use ledger_backend::LedgerBackend;
use ledger_types::AccountId;

/// Bounds applied to the `limit` parameter of `account_objects`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccountObjectsLimits {
    /// Used when the client sends no limit.
    pub default: u32,
    /// Smallest limit applied.
    pub min: u32,
    /// Largest limit applied.
    pub max: u32,
}

impl AccountObjectsLimits {
    /// Default limits: 200, clamped to `[10, 400]`.
    pub const DEFAULT: Self = Self { default: 200, min: 10, max: 400 };

    /// The limit to apply for a client request.
    pub fn clamp(&self, requested: Option<u32>) -> u32 {
        requested.unwrap_or(self.default).clamp(self.min, self.max)
    }
}

impl Default for AccountObjectsLimits {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Handler for `account_objects`.
///
/// Returns one page of the objects owned by an account, and a marker for
/// the next page when more remain.
pub async fn account_objects<B: LedgerBackend>(
    ctx: &RpcContext<B>,
    params: AccountObjectsParams,
) -> RpcResult<AccountObjectsResponse> {
    let account: AccountId = params.account.parse().map_err(|_| RpcError::AccountMalformed)?;
    let sequence = resolve_ledger(&ctx.backend, params.ledger_index.as_ref()).await?;
    let limit = ctx.limits.clamp(params.limit);

    let mut account_objects = Vec::new();
    let cursor = traverse_owned_nodes(
        &ctx.backend,
        account,
        sequence,
        limit,
        params.marker.as_deref(),
        |blob| account_objects.push(hex::encode_upper(&blob)),
    )
    .await?;

    Ok(AccountObjectsResponse {
        account: account.to_string(),
        ledger_index: sequence,
        account_objects,
        limit,
        marker: (!cursor.is_terminal()).then(|| cursor.to_marker()),
    })
}
