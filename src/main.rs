//! cms-agent: the node-side agent of the CMS
//!
//! Exposes a single gRPC service, `com.fyorlando.cms.PingService`, which
//! answers every `Ping` with the request text behind a greeting.
//!
//! Features:
//! - Optional positional port argument (default 50051), validated strictly
//! - Listens on all interfaces
//! - Graceful shutdown on Ctrl-C

mod config;
mod protocols;
mod server;

use config::Config;
use server::AgentServer;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Log filter used when `RUST_LOG` is unset
const DEFAULT_LOG_FILTER: &str = "info";

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Agent terminated");
            ExitCode::FAILURE
        }
    }
}

/// Resolve the port, then serve until Ctrl-C or until the serve loop fails
async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let mut server = AgentServer::new(config.listen_addr()).start()?;

    info!(
        "Agent listening on {} port {}",
        server.local_addr().ip(),
        server.local_addr().port()
    );

    tokio::select! {
        result = server.wait() => result?,
        signal = tokio::signal::ctrl_c() => {
            signal?;
            info!("Shutdown requested");
        }
    }

    server.stop().await?;
    Ok(())
}
