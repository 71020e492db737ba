use anyhow::Context as _;
use clap::Parser as _;
use rmcp::ServiceExt as _;
use rmcp::transport::{async_rw::AsyncRwTransport, stdio};
use shopbridge_mcp_adapter::backend_client::strip_credentials;
use shopbridge_mcp_adapter::config::{AdapterArgs, LogFormat};
use shopbridge_mcp_adapter::transport::SequentialTransport;
use shopbridge_mcp_adapter::{BackendClient, ShopBridgeServer, ToolRegistry};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::EnvFilter;

// Bounds the wait on the blocking stdin reader after a signal-driven shutdown.
const RUNTIME_SHUTDOWN_GRACE: Duration = Duration::from_secs(1);

fn main() -> anyhow::Result<()> {
    let args = AdapterArgs::parse();
    init_tracing(&args.log_level, args.log_format);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("build tokio runtime")?;
    let result = runtime.block_on(run(args));
    runtime.shutdown_timeout(RUNTIME_SHUTDOWN_GRACE);
    result
}

async fn run(args: AdapterArgs) -> anyhow::Result<()> {
    let backend = BackendClient::new(&args.backend_url, args.timeout())
        .context("initialize backend client")?;
    let registry = ToolRegistry::new(args.include_health_check());
    info!(
        backend = %strip_credentials(backend.base_url()),
        tools = registry.descriptors().len(),
        timeout_ms = args.timeout_ms.unwrap_or(0),
        "starting MCP adapter on stdio"
    );

    let server = ShopBridgeServer::new(registry, backend);
    let outcome = serve_stdio(server.clone()).await;
    // The service has dropped its handle by now; this releases the HTTP client on every path.
    server.close();
    outcome
}

async fn serve_stdio(server: ShopBridgeServer) -> anyhow::Result<()> {
    let ct = CancellationToken::new();
    let (stdin, stdout) = stdio();
    let transport = SequentialTransport::new(AsyncRwTransport::new_server(stdin, stdout));
    let service = server
        .serve_with_ct(transport, ct.clone())
        .await
        .context("start stdio MCP service")?;
    info!("MCP adapter running");

    let signal_ct = ct.clone();
    let watcher = tokio::spawn(async move {
        tokio::select! {
            () = shutdown_signal() => {
                info!("shutdown signal received");
                signal_ct.cancel();
            }
            () = signal_ct.cancelled() => {}
        }
    });

    let quit = service.waiting().await.context("MCP service task")?;
    ct.cancel();
    let _ = watcher.await;

    info!(reason = ?quit, "MCP adapter stopped");
    Ok(())
}

fn init_tracing(level: &str, format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    // stdout carries the protocol.
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false);
    match format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        let _ = tokio::signal::ctrl_c().await;
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
