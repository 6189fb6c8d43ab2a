//! JSON-RPC module configuration.
//!
//! This module provides the [`RpcRouter`] builder for creating a jsonrpsee
//! [`RpcModule`] with every ledger query method registered. The module is
//! served by a jsonrpsee [`Server`], which handles the JSON-RPC 2.0
//! envelope: parse errors, invalid requests, unknown methods, batches and
//! notifications.
//!
//! # Example
//!
//! ```ignore
//! use jsonrpsee::server::Server;
//! use ledger_rpc::RpcRouter;
//!
//! let module = RpcRouter::new().build(backend_handle)?;
//!
//! let server = Server::builder().http_only().build("127.0.0.1:51233").await?;
//! let handle = server.start(module);
//! handle.stopped().await;
//! ```
//!
//! [`Server`]: jsonrpsee::server::Server

use crate::{
    error::{RpcError, RpcResult},
    handlers::{self, account::AccountObjectsLimits},
    types::{AccountObjectsResponse, LedgerCurrentResponse, ServerInfoResponse},
};
use jsonrpsee::{RpcModule, core::RegisterMethodError, types::Params};
use ledger_backend::LedgerBackend;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;

/// Shared state handed to every handler.
#[derive(Debug, Clone)]
pub struct RpcContext<B> {
    /// The ledger backend.
    pub backend: B,
    /// Bounds for `account_objects` limits.
    pub limits: AccountObjectsLimits,
}

impl<B: LedgerBackend> RpcContext<B> {
    /// Create a context with default limits.
    pub const fn new(backend: B) -> Self {
        Self { backend, limits: AccountObjectsLimits::DEFAULT }
    }
}

/// Read method parameters: an object, an array holding one object, or
/// nothing.
fn parse_params<T: DeserializeOwned>(params: Params<'_>) -> RpcResult<T> {
    let params: Value = params.parse().map_err(|err| {
        RpcError::invalid_params(format!("Invalid parameters: {}", err.message()))
    })?;
    decode_params(params)
}

fn decode_params<T: DeserializeOwned>(params: Value) -> RpcResult<T> {
    let params = match params {
        Value::Null => Value::Object(Default::default()),
        Value::Array(mut items) if items.len() == 1 => items.remove(0),
        Value::Array(_) => return Err(RpcError::invalid_params("Expected one parameter object.")),
        params => params,
    };
    serde_json::from_value(params)
        .map_err(|err| RpcError::invalid_params(format!("Invalid parameters: {err}")))
}

async fn account_objects<B: LedgerBackend>(
    params: Params<'static>,
    ctx: Arc<RpcContext<B>>,
) -> RpcResult<AccountObjectsResponse> {
    handlers::account::account_objects(&ctx, parse_params(params)?).await
}

async fn ledger_current<B: LedgerBackend>(
    ctx: Arc<RpcContext<B>>,
) -> RpcResult<LedgerCurrentResponse> {
    handlers::ledger_current(&ctx).await
}

async fn server_info<B: LedgerBackend>(ctx: Arc<RpcContext<B>>) -> RpcResult<ServerInfoResponse> {
    handlers::server_info(&ctx).await
}

/// Builder for creating an RPC module.
#[derive(Debug, Clone, Copy, Default)]
pub struct RpcRouter {
    limits: AccountObjectsLimits,
}

impl RpcRouter {
    /// Create a new router builder with default settings.
    pub const fn new() -> Self {
        Self { limits: AccountObjectsLimits::DEFAULT }
    }

    /// Set the bounds applied to `account_objects` limits.
    pub const fn with_limits(mut self, limits: AccountObjectsLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Build the handler context for `backend`.
    pub const fn context<B: LedgerBackend>(self, backend: B) -> RpcContext<B> {
        RpcContext { backend, limits: self.limits }
    }

    /// Build the RPC module with the given backend.
    ///
    /// This registers `account_objects`, `ledger_current` and
    /// `server_info`.
    pub fn build<B: LedgerBackend>(
        self,
        backend: B,
    ) -> Result<RpcModule<RpcContext<B>>, RegisterMethodError> {
        let mut module = RpcModule::new(self.context(backend));
        module.register_async_method("account_objects", |params, ctx, _| {
            account_objects(params, ctx)
        })?;
        module.register_async_method("ledger_current", |_, ctx, _| ledger_current(ctx))?;
        module.register_async_method("server_info", |_, ctx, _| server_info(ctx))?;
        Ok(module)
    }
}
