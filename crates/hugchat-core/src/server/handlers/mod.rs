// Endpoint handlers

mod chat;
mod models;

pub use chat::handle_chat_completions;
pub use models::handle_list_models;

use axum::{
    http::{header::AUTHORIZATION, HeaderMap},
    response::IntoResponse,
    Json,
};
use hugchat_types::Identity;
use serde_json::json;

use super::AppState;
use crate::chat::ChatSession;
use crate::error::GatewayResult;
use crate::session::provider_for;

pub async fn handle_health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

/// Caller identity from the `Authorization` header.
fn identity(headers: &HeaderMap) -> GatewayResult<Identity> {
    let authorization =
        headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok()).unwrap_or_default();
    Ok(Identity::from_authorization(authorization)?)
}

/// Build a logged-in session for `identity`.
async fn open_session(state: &AppState, identity: Identity) -> GatewayResult<ChatSession> {
    tracing::debug!("[Server] Opening session for '{}'", identity.label());
    let credentials =
        provider_for(identity, state.store.clone(), state.authenticator.clone());
    let session = ChatSession::new(state.api.clone(), credentials);
    session.ensure_login().await?;
    Ok(session)
}
