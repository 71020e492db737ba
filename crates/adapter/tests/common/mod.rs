use anyhow::Context as _;
use serde_json::{Value, json};
use std::process::{ExitStatus, Stdio};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt as _, AsyncWriteExt as _, BufReader, Lines};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};

pub use shopbridge_test_support::{TestServer, refused_base_url};

pub const IO_TIMEOUT: Duration = Duration::from_secs(10);

/// Minimal MCP client speaking line-delimited JSON-RPC to the adapter binary's stdio.
///
/// This intentionally avoids any MCP client library; it exists only for integration tests.
pub struct StdioMcpSession {
    child: Child,
    stdin: Option<ChildStdin>,
    stdout: Lines<BufReader<ChildStdout>>,
}

impl StdioMcpSession {
    pub fn spawn(backend_url: &str, extra_args: &[&str]) -> anyhow::Result<Self> {
        let bin = env!("CARGO_BIN_EXE_shopbridge-mcp-adapter");
        let mut child = Command::new(bin)
            .arg("--backend-url")
            .arg(backend_url)
            .arg("--log-level")
            .arg("warn")
            .args(extra_args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .spawn()
            .context("spawn adapter")?;

        let stdin = child.stdin.take().context("adapter stdin")?;
        let stdout = child.stdout.take().context("adapter stdout")?;

        Ok(Self {
            child,
            stdin: Some(stdin),
            stdout: BufReader::new(stdout).lines(),
        })
    }

    /// Spawn and complete the `initialize` handshake.
    pub async fn connect(backend_url: &str, extra_args: &[&str]) -> anyhow::Result<Self> {
        let mut session = Self::spawn(backend_url, extra_args)?;

        let init = session
            .request(
                0,
                "initialize",
                json!({
                    "protocolVersion": "2024-11-05",
                    "capabilities": {},
                    "clientInfo": { "name": "shopbridge-integration-tests", "version": "0" }
                }),
            )
            .await?;
        anyhow::ensure!(init.get("result").is_some(), "initialize failed: {init}");

        session
            .send(&json!({"jsonrpc": "2.0", "method": "notifications/initialized"}))
            .await?;
        Ok(session)
    }

    pub async fn send(&mut self, msg: &Value) -> anyhow::Result<()> {
        let stdin = self.stdin.as_mut().context("stdin already closed")?;
        let mut line = serde_json::to_string(msg)?;
        line.push('\n');
        stdin.write_all(line.as_bytes()).await.context("write stdin")?;
        stdin.flush().await.context("flush stdin")?;
        Ok(())
    }

    /// Next response (a message carrying an `id`); notifications are skipped.
    pub async fn recv(&mut self) -> anyhow::Result<Value> {
        loop {
            let line = tokio::time::timeout(IO_TIMEOUT, self.stdout.next_line())
                .await
                .context("timeout waiting for adapter output")??
                .context("adapter closed stdout")?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let msg: Value = serde_json::from_str(line)
                .with_context(|| format!("adapter wrote non-JSON line: {line}"))?;
            if msg.get("id").is_some() {
                return Ok(msg);
            }
        }
    }

    pub async fn request(&mut self, id: u64, method: &str, params: Value) -> anyhow::Result<Value> {
        self.send(&json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        }))
        .await?;

        let msg = self.recv().await?;
        anyhow::ensure!(msg.get("id") == Some(&json!(id)), "unexpected response: {msg}");
        Ok(msg)
    }

    pub async fn call_tool(&mut self, id: u64, name: &str, arguments: Value) -> anyhow::Result<Value> {
        self.request(id, "tools/call", json!({"name": name, "arguments": arguments}))
            .await
    }

    /// Close stdin (end of stream) and wait for the adapter to exit.
    pub async fn close(mut self) -> anyhow::Result<ExitStatus> {
        drop(self.stdin.take());
        tokio::time::timeout(IO_TIMEOUT, self.child.wait())
            .await
            .context("timeout waiting for adapter exit")?
            .context("wait adapter")
    }
}

/// `result.content[0].text` and `result.isError` of a `tools/call` response.
pub fn tool_text(msg: &Value) -> anyhow::Result<(String, bool)> {
    let result = msg.get("result").context("tools/call missing result")?;
    let text = result
        .get("content")
        .and_then(Value::as_array)
        .and_then(|c| c.first())
        .and_then(|c| c.get("text"))
        .and_then(Value::as_str)
        .context("tools/call missing result.content[0].text")?
        .to_string();
    let is_error = result
        .get("isError")
        .and_then(Value::as_bool)
        .unwrap_or(false);
    Ok((text, is_error))
}
