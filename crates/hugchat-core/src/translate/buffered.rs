use hugchat_types::protocol::{
    AssistantMessage, ChatCompletionResponse, Choice, ContentPart, ImageUrl, MessageContent, Usage,
};
use hugchat_types::StreamEvent;
use tokio::sync::mpsc;

use super::{image_output_url, response_header};
use crate::chat::TurnMeta;
use crate::error::{GatewayError, GatewayResult};

/// Drain the feed and build one completion.
///
/// Completion tokens are the number of token deltas; prompt tokens are
/// always reported as zero. A single text part collapses to plain string
/// content.
pub async fn collect_completion(
    mut events: mpsc::Receiver<StreamEvent>,
    meta: &TurnMeta,
    domain: &str,
) -> GatewayResult<ChatCompletionResponse> {
    let mut tokens: u64 = 0;
    let mut parts: Vec<ContentPart> = Vec::new();

    while let Some(event) = events.recv().await {
        match event {
            StreamEvent::TokenDelta { .. } => tokens += 1,
            StreamEvent::FinalAnswer { text } => {
                if !text.is_empty() {
                    parts.push(ContentPart::Text { text });
                }
            },
            ref file @ StreamEvent::FileAttachment { .. } => {
                if let Some(sha) = file.image_sha() {
                    parts.push(ContentPart::ImageUrl {
                        image_url: ImageUrl {
                            url: image_output_url(domain, &meta.conversation_id, sha),
                            detail: Some("auto".to_string()),
                        },
                    });
                }
            },
            StreamEvent::Error { cause } => return Err(GatewayError::Stream(cause)),
            StreamEvent::Unknown => tracing::warn!("[Translate] Unknown stream event ignored"),
            StreamEvent::Status { .. }
            | StreamEvent::ToolEvent { .. }
            | StreamEvent::Title { .. }
            | StreamEvent::Reasoning { .. } => {},
        }
    }

    let content = match parts.as_slice() {
        [] => MessageContent::Text(String::new()),
        [ContentPart::Text { text }] => MessageContent::Text(text.clone()),
        _ => MessageContent::Parts(parts),
    };

    let header = response_header(meta);
    Ok(ChatCompletionResponse {
        id: header.id,
        object: "chat.completion".to_string(),
        created: header.created,
        model: header.model,
        choices: vec![Choice {
            index: 0,
            message: AssistantMessage { role: "assistant".to_string(), content },
            finish_reason: "stop".to_string(),
        }],
        usage: Usage { prompt_tokens: 0, completion_tokens: tokens, total_tokens: tokens },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta() -> TurnMeta {
        TurnMeta {
            conversation_id: "c1".to_string(),
            model: "m1".to_string(),
            parent_id: "p".to_string(),
        }
    }

    async fn feed(events: Vec<StreamEvent>) -> mpsc::Receiver<StreamEvent> {
        let (tx, rx) = mpsc::channel(events.len().max(1));
        for event in events {
            tx.send(event).await.expect("send");
        }
        rx
    }

    fn token(t: &str) -> StreamEvent {
        StreamEvent::TokenDelta { token: t.to_string() }
    }

    #[tokio::test]
    async fn test_token_count_and_verbatim_text() {
        let rx = feed(vec![
            StreamEvent::Status { status: Some("started".to_string()), message: None },
            token("He"),
            token("llo"),
            token(" world"),
            StreamEvent::Title { title: Some("t".to_string()) },
            StreamEvent::FinalAnswer { text: "Hello world".to_string() },
        ])
        .await;

        let response = collect_completion(rx, &meta(), "https://hf.test").await.expect("completes");
        assert_eq!(response.usage, Usage { prompt_tokens: 0, completion_tokens: 3, total_tokens: 3 });
        assert_eq!(response.model, "m1");
        assert_eq!(response.object, "chat.completion");
        assert!(response.id.starts_with("chatcmpl-"));
        assert_eq!(response.choices[0].finish_reason, "stop");
        assert_eq!(
            response.choices[0].message.content,
            MessageContent::Text("Hello world".to_string())
        );
    }

    #[tokio::test]
    async fn test_image_attachment_keeps_multipart() {
        let rx = feed(vec![
            StreamEvent::FileAttachment {
                name: "img.webp".to_string(),
                sha: "abc123".to_string(),
                mime: "image/webp".to_string(),
            },
            StreamEvent::FileAttachment {
                name: "doc.pdf".to_string(),
                sha: "zzz".to_string(),
                mime: "application/pdf".to_string(),
            },
            StreamEvent::FinalAnswer { text: "Here it is".to_string() },
        ])
        .await;

        let response = collect_completion(rx, &meta(), "https://hf.test/").await.expect("completes");
        let MessageContent::Parts(parts) = &response.choices[0].message.content else {
            panic!("expected multipart content");
        };
        assert_eq!(parts.len(), 2);
        assert_eq!(
            parts[0],
            ContentPart::ImageUrl {
                image_url: ImageUrl {
                    url: "https://hf.test/chat/conversation/c1/output/abc123".to_string(),
                    detail: Some("auto".to_string()),
                },
            }
        );
        assert_eq!(parts[1], ContentPart::Text { text: "Here it is".to_string() });
    }

    #[tokio::test]
    async fn test_error_event_fails_request() {
        let rx = feed(vec![token("a"), StreamEvent::Error { cause: "overloaded".to_string() }]).await;
        let err = collect_completion(rx, &meta(), "https://hf.test").await.unwrap_err();
        assert!(matches!(err, GatewayError::Stream(ref cause) if cause == "overloaded"));
    }

    #[tokio::test]
    async fn test_empty_final_answer_yields_empty_string() {
        let rx = feed(vec![StreamEvent::FinalAnswer { text: String::new() }]).await;
        let response = collect_completion(rx, &meta(), "https://hf.test").await.expect("completes");
        assert_eq!(response.choices[0].message.content, MessageContent::Text(String::new()));
    }
}
