mod cli;
mod server;

use std::sync::Arc;

use clap::Parser;
use eyre::{eyre, WrapErr};

use turnstile_core::esplora::{EsploraApi, HttpEsploraClient};
use turnstile_core::indexer::IndexerClient;
use turnstile_core::node::NodeRpcClient;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    let args = cli::Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_file(true)
        .with_line_number(true)
        .with_level(true)
        .init();

    // Verify the explorer connection before starting the server; every
    // wallet-facing method depends on it.
    let esplora: Arc<dyn EsploraApi> = Arc::new(
        HttpEsploraClient::new(&args.esplora_url, args.esplora_requests_per_second)
            .wrap_err("configure Esplora client")?,
    );
    let fee_rate = esplora.fee_estimate().await.map_err(|err| {
        eyre!("could not reach Esplora endpoint `{}`: {err}", args.esplora_url)
    })?;
    tracing::info!(fee_rate, url = %args.esplora_url, "connected to Esplora");

    let node = Arc::new(NodeRpcClient::new(
        &args.btc_rpc_url,
        args.btc_rpc_user.as_deref(),
        args.btc_rpc_pass.as_deref(),
    ));
    check_node_available(&node, &args.btc_rpc_url).await;

    let indexer = Arc::new(IndexerClient::new(&args.metashrew_rpc_url));

    let state = server::AppState {
        node,
        indexer,
        esplora,
    };
    let router = server::build_router(state);

    let bind_addr = format!("{}:{}", args.bind, args.port);
    if args.bind == "0.0.0.0" {
        tracing::warn!("server is bound to 0.0.0.0: it is accessible from the network");
    }

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .wrap_err("bind TCP listener")?;

    tracing::info!("JSON-RPC gateway listening on {bind_addr}");
    axum::serve(listener, router)
        .await
        .wrap_err("run HTTP server")?;

    Ok(())
}

/// Best-effort node reachability probe. The gateway still serves explorer
/// and indexer methods when the node is down, so failures only warn.
async fn check_node_available(node: &NodeRpcClient, url: &str) {
    let probe_id = serde_json::json!("startup-probe");
    match node.call("getblockchaininfo", &[], &probe_id).await {
        Ok(envelope) => {
            let chain = envelope
                .get("result")
                .and_then(|result| result.get("chain"))
                .and_then(serde_json::Value::as_str)
                .unwrap_or("unknown");
            tracing::info!(chain, "connected to node RPC");
        }
        Err(err) => {
            tracing::warn!(
                %url,
                error = %err,
                "node RPC probe failed; btc_ methods will error until it is reachable"
            );
        }
    }
}
