//! MCP server surface: `tools/list` and `tools/call` over the static registry.

use crate::backend_client::BackendClient;
use crate::error::{AdapterError, Result};
use crate::registry::{ToolInvocation, ToolRegistry};
use rmcp::model::{
    CallToolRequestParams, CallToolResult, Content, Implementation, JsonObject, ListToolsResult,
    PaginatedRequestParams, ServerCapabilities, ServerInfo, Tool,
};
use rmcp::service::RequestContext;
use rmcp::{ErrorData as McpError, RoleServer, ServerHandler};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

pub const SERVER_NAME: &str = "shopbridge";

#[derive(Clone)]
pub struct ShopBridgeServer {
    inner: Arc<ServerInner>,
}

struct ServerInner {
    registry: ToolRegistry,
    backend: BackendClient,
    // Held for a whole call, from lookup to the finished result.
    dispatch: Mutex<()>,
}

impl ShopBridgeServer {
    #[must_use]
    pub fn new(registry: ToolRegistry, backend: BackendClient) -> Self {
        Self {
            inner: Arc::new(ServerInner {
                registry,
                backend,
                dispatch: Mutex::new(()),
            }),
        }
    }

    /// The advertised tool set. Pure: no backend traffic.
    #[must_use]
    pub fn tools(&self) -> Vec<Tool> {
        self.inner.registry.list_tools()
    }

    /// Run one tool call to completion and normalize the outcome.
    ///
    /// Always yields exactly one result; failures become `isError: true` with an `Error: ...`
    /// text block.
    pub async fn invoke(&self, name: &str, arguments: Option<&JsonObject>) -> CallToolResult {
        let _turn = self.inner.dispatch.lock().await;
        let started = Instant::now();
        let outcome = self.dispatch(name, arguments).await;
        let elapsed_ms: u64 = started.elapsed().as_millis().try_into().unwrap_or(u64::MAX);
        match outcome {
            Ok(body) => {
                info!(
                    tool = %name,
                    elapsed_ms,
                    bytes = body.len(),
                    "tool call succeeded"
                );
                CallToolResult::success(vec![Content::text(body)])
            }
            Err(e) => {
                warn!(
                    tool = %name,
                    elapsed_ms,
                    error = %e,
                    "tool call failed"
                );
                CallToolResult::error(vec![Content::text(format!("Error: {e}"))])
            }
        }
    }

    async fn dispatch(&self, name: &str, arguments: Option<&JsonObject>) -> Result<String> {
        let descriptor = self
            .inner
            .registry
            .lookup(name)
            .ok_or_else(|| AdapterError::UnknownTool(name.to_string()))?;
        let invocation = ToolInvocation::parse(descriptor, arguments);
        debug!(
            tool = %name,
            route = invocation.route().path(),
            "dispatching to backend"
        );
        self.inner
            .backend
            .get(invocation.route(), &invocation.query())
            .await
    }

    /// Release the backend client.
    ///
    /// Closes it immediately when this is the last handle; otherwise the client is released when
    /// the remaining handles drop.
    pub fn close(self) {
        match Arc::try_unwrap(self.inner) {
            Ok(inner) => inner.backend.close(),
            Err(_) => debug!("server still shared at close; backend client released on last drop"),
        }
    }
}

impl ServerHandler for ShopBridgeServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "ShopBridge exposes a shop HTTP API as tools.\n\
                 - get_carts(user_id): carts of a user\n\
                 - search_products(channel_id, catalog_id): products of a catalog\n\
                 - health_check(): backend status (when enabled)\n\
                 Results are the backend's raw JSON response bodies."
                    .into(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: SERVER_NAME.into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<ListToolsResult, McpError> {
        Ok(ListToolsResult {
            tools: self.tools(),
            ..Default::default()
        })
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParams,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<CallToolResult, McpError> {
        Ok(self.invoke(&request.name, request.arguments.as_ref()).await)
    }
}
