use clap::{Parser, ValueEnum};
use std::time::Duration;

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Command-line / environment configuration for the adapter binary.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "shopbridge-mcp-adapter",
    version,
    about = "Expose the ShopBridge HTTP API as MCP tools over stdio"
)]
pub struct AdapterArgs {
    /// Base URL of the backend HTTP API.
    #[arg(long, env = "SHOPBRIDGE_BACKEND_URL", default_value = DEFAULT_BACKEND_URL)]
    pub backend_url: String,

    /// Per-request timeout for backend calls in milliseconds (unset or 0 = no timeout).
    #[arg(long, env = "SHOPBRIDGE_TIMEOUT_MS")]
    pub timeout_ms: Option<u64>,

    /// Do not expose the `health_check` tool.
    #[arg(long)]
    pub no_health_check: bool,

    /// Default log level (overridden by `RUST_LOG`). Logs always go to stderr.
    #[arg(long, env = "SHOPBRIDGE_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    #[arg(long, env = "SHOPBRIDGE_LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}

impl AdapterArgs {
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms
            .filter(|ms| *ms > 0)
            .map(Duration::from_millis)
    }

    #[must_use]
    pub fn include_health_check(&self) -> bool {
        !self.no_health_check
    }
}
