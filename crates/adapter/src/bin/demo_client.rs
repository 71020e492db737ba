//! End-to-end demo: query the backend directly, then drive the adapter over MCP stdio.
//!
//! Expects the backend to be running (`shopbridge-backend`). The adapter is spawned as a child
//! process, the way an MCP host would launch it.

use anyhow::Context as _;
use clap::Parser;
use rmcp::ServiceExt as _;
use rmcp::model::{CallToolRequestParams, CallToolResult};
use rmcp::transport::TokioChildProcess;
use serde_json::{Value, json};
use shopbridge_mcp_adapter::config::DEFAULT_BACKEND_URL;
use std::path::PathBuf;
use tokio::process::Command;

#[derive(Debug, Parser)]
#[command(name = "shopbridge-demo", about = "Exercise the ShopBridge backend and MCP adapter")]
struct DemoArgs {
    /// Base URL of the backend HTTP API.
    #[arg(long, env = "SHOPBRIDGE_BACKEND_URL", default_value = DEFAULT_BACKEND_URL)]
    backend_url: String,

    /// Adapter binary to spawn. Defaults to `shopbridge-mcp-adapter` next to this binary.
    #[arg(long)]
    adapter_bin: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = DemoArgs::parse();
    let base = args.backend_url.trim_end_matches('/').to_string();

    println!("== Backend ({base})");
    let http = reqwest::Client::new();
    for path in ["/carts?user_id=1", "/products?channel_id=1&catalog_id=2"] {
        let body: Value = http
            .get(format!("{base}{path}"))
            .send()
            .await
            .with_context(|| format!("GET {path} (is the backend running?)"))?
            .error_for_status()
            .with_context(|| format!("GET {path}"))?
            .json()
            .await
            .with_context(|| format!("GET {path}: parse JSON"))?;
        println!("GET {path}\n{}", serde_json::to_string_pretty(&body)?);
    }

    let adapter_bin = match args.adapter_bin {
        Some(p) => p,
        None => sibling_adapter_bin()?,
    };
    println!("\n== MCP adapter ({})", adapter_bin.display());

    let mut cmd = Command::new(&adapter_bin);
    cmd.arg("--backend-url")
        .arg(&args.backend_url)
        .arg("--log-level")
        .arg("warn");
    let transport = TokioChildProcess::new(cmd).context("spawn adapter")?;
    let client = ().serve(transport).await.context("initialize MCP session")?;

    let tools = client.list_all_tools().await.context("tools/list")?;
    println!("{} tools:", tools.len());
    for tool in &tools {
        println!(
            "  - {}: {}",
            tool.name,
            tool.description.as_deref().unwrap_or("")
        );
    }

    let calls = [
        ("get_carts", json!({ "user_id": 1 })),
        ("search_products", json!({ "channel_id": 1, "catalog_id": 2 })),
    ];
    let mut failed = Vec::new();
    for (name, arguments) in calls {
        let result = client
            .call_tool(call_params(name, arguments)?)
            .await
            .with_context(|| format!("tools/call {name}"))?;
        let text = first_text(&result);
        println!("{name} -> {text}");
        if result.is_error == Some(true) {
            failed.push(name);
        }
    }

    client.cancel().await.context("close MCP session")?;

    anyhow::ensure!(failed.is_empty(), "tool calls failed: {failed:?}");
    println!("\nBackend and MCP adapter are working end to end.");
    Ok(())
}

fn sibling_adapter_bin() -> anyhow::Result<PathBuf> {
    let exe = std::env::current_exe().context("locate current executable")?;
    Ok(exe.with_file_name(format!(
        "shopbridge-mcp-adapter{}",
        std::env::consts::EXE_SUFFIX
    )))
}

fn call_params(name: &str, arguments: Value) -> anyhow::Result<CallToolRequestParams> {
    serde_json::from_value(json!({ "name": name, "arguments": arguments }))
        .context("build tools/call params")
}

fn first_text(result: &CallToolResult) -> String {
    serde_json::to_value(result)
        .ok()
        .and_then(|v| {
            v.get("content")
                .and_then(Value::as_array)
                .and_then(|c| c.first())
                .and_then(|c| c.get("text"))
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .unwrap_or_default()
}
