use async_trait::async_trait;
use hugchat_types::models::cookie_header;
use hugchat_types::{ConversationDetail, SessionCookie};
use reqwest::header::{ACCEPT, COOKIE, LOCATION, ORIGIN};
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};

use super::{ndjson_lines, ChatTurn, HugChatApi, LineStream, HTML_ACCEPT, LOGIN_FORM_MARKER};
use crate::error::{GatewayError, GatewayResult};
use crate::graph::{self, DetailPage, Listing};

/// Longest body excerpt carried by `RemoteHttp` errors.
const BODY_SNIPPET_LEN: usize = 512;

#[derive(Serialize)]
struct CreateConversationRequest<'a> {
    model: &'a str,
    preprompt: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateConversationResponse {
    conversation_id: String,
}

/// reqwest-backed implementation of [`HugChatApi`].
#[derive(Clone)]
pub struct RemoteClient {
    client: reqwest::Client,
    domain: String,
}

impl RemoteClient {
    /// `client` must not follow redirects.
    pub fn new(client: reqwest::Client, domain: impl Into<String>) -> Self {
        let domain = domain.into().trim_end_matches('/').to_string();
        Self { client, domain }
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    fn request(&self, method: Method, path: &str, cookies: &[SessionCookie]) -> RequestBuilder {
        let builder = self
            .client
            .request(method, format!("{}{}", self.domain, path))
            .header(ORIGIN, &self.domain);
        if cookies.is_empty() {
            builder
        } else {
            builder.header(COOKIE, cookie_header(cookies))
        }
    }

    /// Send and require `200 OK`.
    async fn send(&self, builder: RequestBuilder) -> GatewayResult<Response> {
        let response = builder.send().await?;
        let status = response.status();
        if status == StatusCode::OK {
            return Ok(response);
        }

        let redirects_to_login = status.is_redirection()
            && response
                .headers()
                .get(LOCATION)
                .and_then(|v| v.to_str().ok())
                .is_some_and(|loc| loc.contains("/login"));
        let body = response.text().await.unwrap_or_default();

        if status == StatusCode::UNAUTHORIZED || redirects_to_login || body.contains(LOGIN_FORM_MARKER)
        {
            tracing::debug!("[Remote] Session rejected (HTTP {})", status);
            return Err(GatewayError::Unauthorized);
        }

        tracing::debug!("[Remote] Unexpected HTTP {}: {}", status, body);
        Err(GatewayError::RemoteHttp { status: status.as_u16(), body: snippet(&body) })
    }

    async fn get_text(&self, path: &str, cookies: &[SessionCookie]) -> GatewayResult<String> {
        let response = self.send(self.request(Method::GET, path, cookies)).await?;
        Ok(response.text().await?)
    }
}

#[async_trait]
impl HugChatApi for RemoteClient {
    async fn list_models_and_conversations(
        &self,
        cookies: &[SessionCookie],
    ) -> GatewayResult<Listing> {
        let body =
            self.get_text("/chat/models/__data.json?x-sveltekit-invalidated=10", cookies).await?;
        Ok(graph::decode_listing(&body)?)
    }

    async fn conversation_detail(
        &self,
        cookies: &[SessionCookie],
        conversation_id: &str,
    ) -> GatewayResult<ConversationDetail> {
        let path =
            format!("/chat/conversation/{conversation_id}/__data.json?x-sveltekit-invalidated=01");
        let body = self.get_text(&path, cookies).await?;
        match graph::decode_detail(conversation_id, &body)? {
            DetailPage::Conversation(detail) => Ok(detail),
            DetailPage::AccessDenied => {
                tracing::debug!("[Remote] Access denied to conversation {}", conversation_id);
                Err(GatewayError::Unauthorized)
            },
        }
    }

    async fn conversation_detail_after_create(
        &self,
        cookies: &[SessionCookie],
        conversation_id: &str,
    ) -> GatewayResult<ConversationDetail> {
        let path =
            format!("/chat/conversation/{conversation_id}/__data.json?x-sveltekit-invalidated=11");
        let body = self.get_text(&path, cookies).await?;
        Ok(graph::decode_detail_after_create(conversation_id, &body)?)
    }

    async fn create_conversation(
        &self,
        cookies: &[SessionCookie],
        model: &str,
        preprompt: &str,
    ) -> GatewayResult<String> {
        let builder = self
            .request(Method::POST, "/chat/conversation", cookies)
            .json(&CreateConversationRequest { model, preprompt });
        let created: CreateConversationResponse = self.send(builder).await?.json().await?;
        tracing::info!("[Remote] Created conversation {} for model {}", created.conversation_id, model);
        Ok(created.conversation_id)
    }

    async fn delete_conversation(
        &self,
        cookies: &[SessionCookie],
        conversation_id: &str,
    ) -> GatewayResult<()> {
        let path = format!("/chat/conversation/{conversation_id}");
        self.send(self.request(Method::DELETE, &path, cookies)).await?;
        tracing::info!("[Remote] Deleted conversation {}", conversation_id);
        Ok(())
    }

    async fn submit_chat_turn(
        &self,
        cookies: &[SessionCookie],
        conversation_id: &str,
        turn: &ChatTurn,
    ) -> GatewayResult<LineStream> {
        let data = serde_json::to_string(turn)?;
        let path = format!("/chat/conversation/{conversation_id}");
        let builder = self
            .request(Method::POST, &path, cookies)
            .header(ACCEPT, "*/*")
            .form(&[("data", data)]);
        let response = self.send(builder).await?;
        tracing::debug!("[Remote] Chat feed opened for conversation {}", conversation_id);
        Ok(ndjson_lines(response.bytes_stream()))
    }

    async fn check_login(&self, cookies: &[SessionCookie]) -> GatewayResult<bool> {
        let response = self
            .client
            .get(format!("{}/chat/", self.domain))
            .header(ORIGIN, &self.domain)
            .header(ACCEPT, HTML_ACCEPT)
            .header(COOKIE, cookie_header(cookies))
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;
        if status != StatusCode::OK {
            return Err(GatewayError::RemoteHttp { status: status.as_u16(), body: snippet(&body) });
        }
        Ok(!body.contains(LOGIN_FORM_MARKER))
    }
}

fn snippet(body: &str) -> String {
    match body.char_indices().nth(BODY_SNIPPET_LEN) {
        Some((cut, _)) => format!("{}…", &body[..cut]),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::client;
    use futures::StreamExt;
    use wiremock::matchers::{body_string_contains, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn session() -> Vec<SessionCookie> {
        vec![SessionCookie::from_token("tok")]
    }

    #[tokio::test]
    async fn test_check_login_uses_form_marker() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/chat/"))
            .and(header("cookie", "hf-chat=tok"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>chat</html>"))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/chat/"))
            .and(header("cookie", "hf-chat=old"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(r#"<form action="/chat/login" method="POST"></form>"#),
            )
            .mount(&server)
            .await;

        let remote = RemoteClient::new(client(), server.uri());
        assert!(remote.check_login(&session()).await.expect("probe"));
        assert!(!remote
            .check_login(&[SessionCookie::from_token("old")])
            .await
            .expect("probe"));
    }

    #[tokio::test]
    async fn test_login_marker_on_error_is_unauthorized() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/chat/models/__data.json"))
            .and(query_param("x-sveltekit-invalidated", "10"))
            .respond_with(
                ResponseTemplate::new(403).set_body_string(r#"<form action="/chat/login"></form>"#),
            )
            .mount(&server)
            .await;

        let remote = RemoteClient::new(client(), server.uri());
        let err = remote.list_models_and_conversations(&session()).await.unwrap_err();
        assert!(err.is_unauthorized());
    }

    #[tokio::test]
    async fn test_other_errors_carry_status_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/chat/conversation/c1"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let remote = RemoteClient::new(client(), server.uri());
        let err = remote.delete_conversation(&session(), "c1").await.unwrap_err();
        assert!(matches!(err, GatewayError::RemoteHttp { status: 500, ref body } if body == "boom"));
    }

    #[tokio::test]
    async fn test_create_conversation() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/conversation"))
            .and(body_string_contains(r#""model":"m1""#))
            .and(body_string_contains(r#""preprompt":"""#))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"conversationId": "c7"})),
            )
            .mount(&server)
            .await;

        let remote = RemoteClient::new(client(), server.uri());
        let id = remote.create_conversation(&session(), "m1", "").await.expect("creates");
        assert_eq!(id, "c7");
    }

    #[tokio::test]
    async fn test_submit_chat_turn_streams_lines() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/conversation/c1"))
            .and(header("content-type", "application/x-www-form-urlencoded"))
            .and(body_string_contains("data="))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                "{\"type\":\"status\",\"status\":\"started\"}\n{\"type\":\"stream\",\"token\":\"hi\"}\n",
            ))
            .mount(&server)
            .await;

        let remote = RemoteClient::new(client(), server.uri());
        let turn = ChatTurn::new("msg-1", "user: hi");
        let lines: Vec<String> = remote
            .submit_chat_turn(&session(), "c1", &turn)
            .await
            .expect("opens feed")
            .map(|l| l.expect("line"))
            .collect()
            .await;
        assert_eq!(lines.len(), 2);
        assert!(lines[1].contains("\"token\":\"hi\""));
    }

    #[test]
    fn test_chat_turn_wire_shape() {
        let json = serde_json::to_value(ChatTurn::new("p", "x")).expect("serializes");
        assert_eq!(json["id"], "p");
        assert_eq!(json["is_continue"], false);
        assert_eq!(json["is_retry"], false);
        assert_eq!(json["tools"], serde_json::json!([]));
        assert_eq!(json["files"], serde_json::json!([]));
    }
}
