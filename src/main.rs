//! MultiLLM-RS - multi-provider LLM request router
//!
//! Async gateway service routing completion requests across providers

use clap::Parser;
use multillm_rs::server;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Gateway command-line arguments
#[derive(Debug, Parser)]
#[command(name = "gateway", version, about)]
struct Args {
    /// Path to the gateway configuration file
    #[arg(long, env = "GATEWAY_CONFIG", default_value = "config/gateway.yaml")]
    config: String,
}

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging system; RUST_LOG overrides the default level
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    let args = Args::parse();

    match server::builder::run_server(&args.config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
