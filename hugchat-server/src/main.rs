//! HuggingChat gateway daemon.
//!
//! Serves `/v1/models` and `/v1/chat/completions` in the OpenAI shape and
//! forwards them to HuggingChat with the caller's credentials.

use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tracing::info;

mod cli;
mod http_client;
mod server_utils;

use cli::Cli;
use hugchat_core::session::SessionStore;
use hugchat_core::{build_router, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    server_utils::init_logging(&cli.log_level, cli.debug)?;

    info!("🚀 HuggingChat gateway v{} starting", env!("CARGO_PKG_VERSION"));

    let client = http_client::build_http_client()?;
    let store = Arc::new(SessionStore::load(&cli.session_file)?);
    info!(
        "📂 Session file {} ({} cached identities)",
        store.path().display(),
        store.len()
    );

    let state = AppState::new(client, &cli.domain, store);
    info!("🔀 Forwarding to {}", state.domain);

    let app = build_router(state);
    let listener = server_utils::create_listener(&cli.host, cli.port).await?;

    axum::serve(listener, app).with_graceful_shutdown(server_utils::shutdown_signal()).await?;

    info!("👋 Gateway stopped");
    Ok(())
}
