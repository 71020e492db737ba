//! MCP adapter exposing the `ShopBridge` HTTP API as tools over stdio.
//!
//! Each `tools/call` maps 1:1 onto one `GET` against the backend; the response body is relayed
//! verbatim as the tool result text.

pub mod backend_client;
pub mod config;
pub mod error;
pub mod registry;
pub mod server;
pub mod transport;

pub use backend_client::BackendClient;
pub use error::{AdapterError, Result};
pub use registry::{ToolDescriptor, ToolInvocation, ToolRegistry, ToolRoute};
pub use server::ShopBridgeServer;
