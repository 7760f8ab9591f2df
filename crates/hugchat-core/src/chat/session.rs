use futures::{Future, StreamExt};
use hugchat_types::protocol::ChatMessage;
use hugchat_types::{AuthError, ConversationDetail, ModelInfo, SessionCookie, StreamEvent};
use parking_lot::Mutex;
use rand::seq::SliceRandom;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;

use super::build_prompt;
use crate::error::{GatewayError, GatewayResult};
use crate::remote::{ChatTurn, HugChatApi, LineStream};
use crate::session::CredentialProvider;

/// Capacity of the channel between the feed pump and the renderer.
pub const EVENT_CHANNEL_CAPACITY: usize = 64;

/// What the renderer needs to know about a submitted turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnMeta {
    pub conversation_id: String,
    /// Model reported by the conversation detail.
    pub model: String,
    /// Message the turn was attached to.
    pub parent_id: String,
}

/// A submitted turn: its metadata and the ordered event feed.
pub struct TurnHandle {
    pub meta: TurnMeta,
    pub events: mpsc::Receiver<StreamEvent>,
}

/// Orchestrates one inbound request against the remote application.
pub struct ChatSession {
    api: Arc<dyn HugChatApi>,
    credentials: Arc<dyn CredentialProvider>,
    cookies: Mutex<Vec<SessionCookie>>,
    refreshed: AtomicBool,
}

impl ChatSession {
    pub fn new(api: Arc<dyn HugChatApi>, credentials: Arc<dyn CredentialProvider>) -> Self {
        Self {
            api,
            credentials,
            cookies: Mutex::new(Vec::new()),
            refreshed: AtomicBool::new(false),
        }
    }

    /// Load the session and probe it; refresh once if the remote reports it logged out.
    pub async fn ensure_login(&self) -> GatewayResult<()> {
        let cookies = self.credentials.cookies().await?;
        *self.cookies.lock() = cookies.clone();
        if self.api.check_login(&cookies).await? {
            return Ok(());
        }

        tracing::warn!(
            "[Chat] Session for '{}' is logged out, refreshing",
            self.credentials.identity_key()
        );
        let cookies = self.refresh_once().await?;
        if self.api.check_login(&cookies).await? {
            return Ok(());
        }
        Err(AuthError::LoginRejected.into())
    }

    /// Every model the remote offers, listed or not.
    pub async fn list_models(&self) -> GatewayResult<Vec<ModelInfo>> {
        let api = &self.api;
        let listing = self
            .with_refresh("list models", |cookies| async move {
                api.list_models_and_conversations(&cookies).await
            })
            .await?;
        Ok(listing.models)
    }

    /// Reuse a random conversation already bound to `model`, or create one.
    pub async fn resolve_conversation(&self, model: &str) -> GatewayResult<ConversationDetail> {
        let api = &self.api;
        let listing = self
            .with_refresh("list conversations", |cookies| async move {
                api.list_models_and_conversations(&cookies).await
            })
            .await?;

        let matching: Vec<_> =
            listing.conversations.iter().filter(|c| c.model == model).collect();
        let chosen = matching.choose(&mut rand::thread_rng()).map(|c| c.id.clone());

        match chosen {
            Some(id) => {
                tracing::debug!(
                    "[Chat] Reusing conversation {} ({} candidate(s) for {})",
                    id,
                    matching.len(),
                    model
                );
                let id = id.as_str();
                self.with_refresh("conversation detail", |cookies| async move {
                    api.conversation_detail(&cookies, id).await
                })
                .await
            },
            None => {
                tracing::info!("[Chat] No conversation for model {}, creating one", model);
                let created = self
                    .with_refresh("create conversation", |cookies| async move {
                        api.create_conversation(&cookies, model, "").await
                    })
                    .await?;
                let id = created.as_str();
                self.with_refresh("conversation detail", |cookies| async move {
                    api.conversation_detail_after_create(&cookies, id).await
                })
                .await
            },
        }
    }

    /// Resolve a conversation, submit the flattened history and start pumping
    /// the remote feed into a channel.
    pub async fn start_turn(
        &self,
        model: &str,
        messages: &[ChatMessage],
    ) -> GatewayResult<TurnHandle> {
        let detail = self.resolve_conversation(model).await?;
        let parent_id = match detail.last_message_id() {
            Some(id) => id.to_string(),
            None => {
                tracing::warn!("[Chat] Conversation {} has no messages", detail.id);
                uuid::Uuid::new_v4().to_string()
            },
        };

        let turn = ChatTurn::new(parent_id.clone(), build_prompt(messages));
        let api = &self.api;
        let conversation_id = detail.id.as_str();
        let turn_ref = &turn;
        let lines = self
            .with_refresh("submit turn", |cookies| async move {
                api.submit_chat_turn(&cookies, conversation_id, turn_ref).await
            })
            .await?;

        let (tx, rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        tokio::spawn(pump_events(lines, tx));

        Ok(TurnHandle {
            meta: TurnMeta { conversation_id: detail.id, model: detail.model, parent_id },
            events: rx,
        })
    }

    /// Delete a conversation on the remote.
    pub async fn delete_conversation(&self, conversation_id: &str) -> GatewayResult<()> {
        let api = &self.api;
        self.with_refresh("delete conversation", |cookies| async move {
            api.delete_conversation(&cookies, conversation_id).await
        })
        .await
    }

    /// Run `call` with the current cookies. On `Unauthorized`, refresh the
    /// session (at most once per `ChatSession`) and run it one more time.
    async fn with_refresh<T, F, Fut>(&self, op: &'static str, call: F) -> GatewayResult<T>
    where
        F: Fn(Vec<SessionCookie>) -> Fut,
        Fut: Future<Output = GatewayResult<T>>,
    {
        let cookies = self.cookies.lock().clone();
        match call(cookies).await {
            Err(GatewayError::Unauthorized) => {
                tracing::warn!("[Chat] '{}' unauthorized, refreshing session once", op);
                let fresh = self.refresh_once().await?;
                match call(fresh).await {
                    Err(GatewayError::Unauthorized) => {
                        tracing::warn!("[Chat] '{}' still unauthorized after refresh", op);
                        Err(AuthError::LoginRejected.into())
                    },
                    other => other,
                }
            },
            other => other,
        }
    }

    async fn refresh_once(&self) -> GatewayResult<Vec<SessionCookie>> {
        if self.refreshed.swap(true, Ordering::SeqCst) {
            return Err(AuthError::LoginRejected.into());
        }
        let fresh = self.credentials.refresh().await?;
        *self.cookies.lock() = fresh.clone();
        Ok(fresh)
    }
}

/// Read the feed line by line and forward parsed events in order.
///
/// Blank lines are skipped. A line that is not a valid event, or a transport
/// error, is forwarded as one `Error` event and ends the pump. If the
/// consumer goes away the feed is still read to EOF. The channel closes when
/// the pump returns.
pub(crate) async fn pump_events(mut lines: LineStream, tx: mpsc::Sender<StreamEvent>) {
    while let Some(item) = lines.next().await {
        let event = match item {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                match serde_json::from_str::<StreamEvent>(line) {
                    Ok(StreamEvent::Unknown) => {
                        tracing::warn!("[Chat] Unknown feed event: {}", line);
                        StreamEvent::Unknown
                    },
                    Ok(event) => {
                        tracing::debug!("[Chat] Feed event '{}'", event.kind());
                        event
                    },
                    Err(e) => {
                        tracing::warn!("[Chat] Malformed feed line: {}", e);
                        let cause = format!("malformed feed line: {e}");
                        let _ = tx.send(StreamEvent::Error { cause }).await;
                        return;
                    },
                }
            },
            Err(e) => {
                tracing::warn!("[Chat] Feed transport error: {}", e);
                let _ = tx.send(StreamEvent::Error { cause: e.to_string() }).await;
                return;
            },
        };

        if tx.send(event).await.is_err() {
            // The submission keeps running remotely; read it to the end.
            tracing::debug!("[Chat] Event consumer dropped, draining feed");
            while lines.next().await.is_some() {}
            return;
        }
    }
    tracing::debug!("[Chat] Feed closed");
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod session_tests;
