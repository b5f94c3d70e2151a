//! Configuration module for the CMS agent.
//!
//! The only setting is the listening port, taken from an optional
//! positional argument. The agent always binds all interfaces.

use clap::Parser;
use std::net::{Ipv4Addr, SocketAddr};
use thiserror::Error;

/// Port used when no argument is given.
pub const DEFAULT_PORT: u16 = 50051;

/// Command-line arguments for the agent
#[derive(Parser, Debug)]
#[command(name = "cms-agent")]
#[command(version)]
#[command(about = "CMS agent exposing the PingService gRPC endpoint", long_about = None)]
pub struct CliArgs {
    /// Port to listen on (1-65535)
    #[arg(value_name = "PORT", allow_negative_numbers = true)]
    pub port: Option<String>,
}

/// Rejected port values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PortError {
    #[error("port argument must be a number, got '{0}'")]
    NotANumber(String),
    #[error("port must be between 1 and 65535, got {0}")]
    OutOfRange(i64),
}

/// Resolve the listening port from the optional positional argument.
///
/// No argument means [`DEFAULT_PORT`]. Anything else must parse as an
/// integer in `1..=65535`; there is no fallback on bad input.
pub fn resolve_port(arg: Option<&str>) -> Result<u16, PortError> {
    let Some(arg) = arg else {
        return Ok(DEFAULT_PORT);
    };

    let value: i64 = arg
        .parse()
        .map_err(|_| PortError::NotANumber(arg.to_string()))?;
    validate_port(value)
}

/// Check that `value` is a usable TCP port.
pub fn validate_port(value: i64) -> Result<u16, PortError> {
    match u16::try_from(value) {
        Ok(port) if port != 0 => Ok(port),
        _ => Err(PortError::OutOfRange(value)),
    }
}

/// Final resolved configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    pub port: u16,
}

impl Config {
    /// Load configuration from the process arguments.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_cli(CliArgs::parse())
    }

    /// Resolve configuration from already-parsed arguments.
    pub fn from_cli(cli: CliArgs) -> Result<Self, ConfigError> {
        Ok(Config {
            port: resolve_port(cli.port.as_deref())?,
        })
    }

    /// Socket address the agent binds to: all interfaces on `port`.
    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::from((Ipv4Addr::UNSPECIFIED, self.port))
    }
}

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid port: {0}")]
    Port(#[from] PortError),
}
