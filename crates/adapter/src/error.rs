//! Error types for the MCP adapter.

use thiserror::Error;

/// Main error type for the adapter.
///
/// Per-call variants (`UnknownTool`, `BackendHttp`, `Transport`) are never
/// fatal: the server turns them into an `isError` tool result. The rest only occur at startup.
#[derive(Error, Debug)]
pub enum AdapterError {
    /// Tool name not present in the registry
    #[error("Unknown tool {0}")]
    UnknownTool(String),

    /// Backend answered with a non-2xx status
    #[error("Backend returned {status} {reason}: {body}")]
    BackendHttp {
        status: u16,
        reason: String,
        body: String,
    },

    /// Backend unreachable (connection refused, DNS, timeout, broken body)
    #[error("Backend request failed: {0}")]
    Transport(String),

    /// Configuration errors (invalid backend URL)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Startup errors (HTTP client failed to initialize)
    #[error("Startup error: {0}")]
    Startup(String),
}

/// Result type alias for adapter operations.
pub type Result<T> = std::result::Result<T, AdapterError>;
