//! HTTP operations against the remote chat application.
//!
//! [`HugChatApi`] is the seam the orchestrator talks to; [`RemoteClient`] is
//! the reqwest implementation. Every operation receives the cookies to send,
//! so a refreshed session is picked up on the next call without any shared
//! client state.

mod client;
mod ndjson;

pub use client::RemoteClient;
pub use ndjson::ndjson_lines;

use async_trait::async_trait;
use futures::stream::BoxStream;
use hugchat_types::{ConversationDetail, SessionCookie};
use serde::Serialize;

use crate::error::GatewayResult;
use crate::graph::Listing;

/// `Accept` header sent when the remote must answer with an HTML page.
pub const HTML_ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,image/apng,*/*;q=0.8,application/signed-exchange;v=b3;q=0.7";

/// Fragment of the login form that only appears when logged out.
pub const LOGIN_FORM_MARKER: &str = "action=\"/chat/login\"";

/// Raw lines of the chat feed, in arrival order.
pub type LineStream = BoxStream<'static, GatewayResult<String>>;

/// One chat turn as submitted in the `data` form field.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ChatTurn {
    /// Parent message id.
    pub id: String,
    pub inputs: String,
    pub is_continue: bool,
    pub is_retry: bool,
    pub web_search: bool,
    pub tools: Vec<String>,
    pub files: Vec<String>,
}

impl ChatTurn {
    pub fn new(parent_id: impl Into<String>, inputs: impl Into<String>) -> Self {
        Self {
            id: parent_id.into(),
            inputs: inputs.into(),
            is_continue: false,
            is_retry: false,
            web_search: false,
            tools: Vec::new(),
            files: Vec::new(),
        }
    }
}

/// Remote operations. Implementations return `GatewayError::Unauthorized`
/// when the session is rejected; they never refresh on their own.
#[async_trait]
pub trait HugChatApi: Send + Sync {
    async fn list_models_and_conversations(
        &self,
        cookies: &[SessionCookie],
    ) -> GatewayResult<Listing>;

    async fn conversation_detail(
        &self,
        cookies: &[SessionCookie],
        conversation_id: &str,
    ) -> GatewayResult<ConversationDetail>;

    async fn conversation_detail_after_create(
        &self,
        cookies: &[SessionCookie],
        conversation_id: &str,
    ) -> GatewayResult<ConversationDetail>;

    /// Create a conversation and return its id.
    async fn create_conversation(
        &self,
        cookies: &[SessionCookie],
        model: &str,
        preprompt: &str,
    ) -> GatewayResult<String>;

    async fn delete_conversation(
        &self,
        cookies: &[SessionCookie],
        conversation_id: &str,
    ) -> GatewayResult<()>;

    /// Post a turn and hand back the unread response body as lines.
    async fn submit_chat_turn(
        &self,
        cookies: &[SessionCookie],
        conversation_id: &str,
        turn: &ChatTurn,
    ) -> GatewayResult<LineStream>;

    /// Whether the cookies belong to a logged-in session.
    async fn check_login(&self, cookies: &[SessionCookie]) -> GatewayResult<bool>;
}
