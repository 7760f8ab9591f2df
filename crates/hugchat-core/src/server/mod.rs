//! Inbound OpenAI-compatible HTTP surface.
//!
//! Routes:
//! - `GET  /v1/models`            every remote model
//! - `POST /v1/chat/completions`  buffered or SSE completion
//! - `GET  /health`               liveness, never touches the remote

pub mod handlers;
pub mod middleware;
mod response;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::remote::{HugChatApi, RemoteClient};
use crate::session::{Authenticator, SessionStore};

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub api: Arc<dyn HugChatApi>,
    pub store: Arc<SessionStore>,
    pub authenticator: Authenticator,
    /// Remote origin, used to build image output URLs.
    pub domain: Arc<str>,
}

impl AppState {
    /// Production wiring: one redirect-free client shared by the remote
    /// client and the login handshake.
    pub fn new(client: reqwest::Client, domain: &str, store: Arc<SessionStore>) -> Self {
        let remote = RemoteClient::new(client.clone(), domain);
        let domain: Arc<str> = Arc::from(remote.domain());
        Self {
            authenticator: Authenticator::new(client, domain.as_ref()),
            api: Arc::new(remote),
            store,
            domain,
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/v1/models", get(handlers::handle_list_models))
        .route("/v1/chat/completions", post(handlers::handle_chat_completions))
        .route("/health", get(handlers::handle_health))
        .layer(axum::middleware::from_fn(middleware::request_log_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::cors_layer())
        .with_state(state)
}
