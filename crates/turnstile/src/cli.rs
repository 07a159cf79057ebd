use clap::Parser;

/// Turnstile: JSON-RPC gateway in front of a Bitcoin Core node, an indexer,
/// and an Esplora block explorer.
#[derive(Parser)]
#[command(version, about)]
pub struct Cli {
    /// Bitcoin Core RPC URL.
    #[arg(long, env = "BTC_RPC_URL")]
    pub btc_rpc_url: String,

    /// Bitcoin Core RPC username.
    #[arg(long, env = "BTC_RPC_USER")]
    pub btc_rpc_user: Option<String>,

    /// Bitcoin Core RPC password.
    #[arg(long, env = "BTC_RPC_PASS")]
    pub btc_rpc_pass: Option<String>,

    /// Indexer JSON-RPC URL.
    #[arg(long, env = "METASHREW_RPC_URL")]
    pub metashrew_rpc_url: String,

    /// Esplora REST API base URL.
    #[arg(long, env = "ELECTRUM_API_URL")]
    pub esplora_url: String,

    /// Outbound rate limit for the explorer backend, in requests per second.
    /// Unlimited when omitted.
    #[arg(long)]
    pub esplora_requests_per_second: Option<u32>,

    /// Address to bind to.
    #[arg(long, default_value = "127.0.0.1")]
    pub bind: String,

    /// Port to listen on.
    #[arg(long, default_value = "8080", env = "PORT")]
    pub port: u16,
}
