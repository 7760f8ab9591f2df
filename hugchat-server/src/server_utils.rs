use anyhow::{Context, Result};
use std::net::SocketAddr;
use tokio::signal;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// `--debug` raises the gateway crates to debug on top of `--log-level`.
pub fn init_logging(log_level: &str, debug: bool) -> Result<()> {
    let mut filter = EnvFilter::try_new(log_level)
        .with_context(|| format!("invalid log filter '{log_level}'"))?;
    if debug {
        filter = filter
            .add_directive("hugchat_core=debug".parse()?)
            .add_directive("hugchat_server=debug".parse()?);
    }

    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();
    Ok(())
}

pub async fn create_listener(host: &str, port: u16) -> Result<tokio::net::TcpListener> {
    let ip: std::net::IpAddr =
        host.parse().map_err(|e| anyhow::anyhow!("Invalid bind address '{}': {}", host, e))?;
    let addr = SocketAddr::new(ip, port);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("🌐 Listening on http://{}", addr);
    Ok(listener)
}

#[allow(
    clippy::expect_used,
    reason = "Signal handlers are critical infrastructure, panic is appropriate on failure"
)]
pub async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c().await.expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("🛑 Received Ctrl+C, shutting down"),
        () = terminate => info!("🛑 Received SIGTERM, shutting down"),
    }
}
