use anyhow::{Context, Result};
use clap::Parser;
use ledger_node::{
    builder::NodeBuilder,
    config::{
        BackendMode, DEFAULT_CACHE_SIZE, DEFAULT_RPC_ADDR, ENV_BACKEND, ENV_CACHE_SIZE,
        ENV_RPC_ADDR, ENV_SQL_URL,
    },
};
use jsonrpsee::server::Server;
use ledger_rpc::RpcRouter;
use std::{net::SocketAddr, num::NonZeroUsize};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Flags override the matching environment variables.
#[derive(Parser, Debug)]
#[command(
    name = "ledger-node",
    version,
    about = "Serve owned-object queries over JSON-RPC",
    long_about = None
)]
struct Cli {
    /// Backend mode: `memory` or `sql`.
    #[arg(long, env = ENV_BACKEND)]
    backend: BackendMode,
    /// SQL connection URL, required with `--backend sql`.
    #[arg(long, env = ENV_SQL_URL)]
    sql_url: Option<String>,
    /// Socket address to serve JSON-RPC on.
    #[arg(long, env = ENV_RPC_ADDR, default_value_t = DEFAULT_RPC_ADDR)]
    rpc_addr: SocketAddr,
    /// Capacity of the object cache.
    #[arg(long, env = ENV_CACHE_SIZE, default_value_t = DEFAULT_CACHE_SIZE)]
    cache_size: NonZeroUsize,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let cancel = CancellationToken::new();
    let mut builder =
        NodeBuilder::new().mode(cli.backend).cache_size(cli.cache_size).cancel_token(cancel.clone());
    if let Some(url) = cli.sql_url {
        builder = builder.sql_url(url);
    }
    let handle = builder.build().await.context("failed to open ledger backend")?;

    let module = RpcRouter::new().build(handle).context("failed to register rpc methods")?;
    let server = Server::builder()
        .http_only()
        .build(cli.rpc_addr)
        .await
        .with_context(|| format!("failed to bind {}", cli.rpc_addr))?;
    info!(addr = %server.local_addr()?, backend = %cli.backend, "serving JSON-RPC");
    let server_handle = server.start(module);

    tokio::spawn(cancel_on_ctrl_c(cancel.clone()));
    cancel.cancelled().await;

    // Already stopped is fine; either way wait for open connections.
    let _ = server_handle.stop();
    server_handle.stopped().await;
    info!("ledger node stopped");
    Ok(())
}

async fn cancel_on_ctrl_c(cancel: CancellationToken) {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(%err, "failed to listen for ctrl-c");
        return;
    }
    info!("shutdown requested");
    cancel.cancel();
}

fn init_tracing() {
    let subscriber = tracing_subscriber::fmt().with_env_filter(
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    );
    let _ = subscriber.try_init();
}
