use clap::{Parser, ValueEnum};
use std::net::SocketAddr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Command-line / environment configuration for the backend binary.
#[derive(Debug, Clone, Parser)]
#[command(name = "shopbridge-backend", version, about = "ShopBridge demo HTTP API")]
pub struct BackendArgs {
    /// Address to listen on.
    #[arg(long, env = "SHOPBRIDGE_BACKEND_BIND", default_value = "127.0.0.1:8000")]
    pub bind: SocketAddr,

    /// Default log level (overridden by `RUST_LOG`).
    #[arg(long, env = "SHOPBRIDGE_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    #[arg(long, env = "SHOPBRIDGE_LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}
