//! Events of the remote chat feed (one JSON object per NDJSON line).

use serde::{Deserialize, Serialize};

/// MIME type of images the remote renders for a turn.
pub const IMAGE_WEBP: &str = "image/webp";

/// One decoded line of the remote chat feed.
///
/// Exactly one `FinalAnswer` and any number of `TokenDelta` /
/// `FileAttachment` events occur per successful turn. An `Error` ends the
/// sequence early.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum StreamEvent {
    #[serde(rename = "status")]
    Status {
        #[serde(default)]
        status: Option<String>,
        #[serde(default)]
        message: Option<String>,
    },

    #[serde(rename = "stream")]
    TokenDelta {
        #[serde(default)]
        token: String,
    },

    #[serde(rename = "finalAnswer")]
    FinalAnswer {
        #[serde(default)]
        text: String,
    },

    #[serde(rename = "file")]
    FileAttachment {
        #[serde(default)]
        name: String,
        #[serde(default)]
        sha: String,
        #[serde(default)]
        mime: String,
    },

    /// Tool-call progress. Only tagged, never interpreted.
    #[serde(rename = "tool")]
    ToolEvent {
        #[serde(default)]
        subtype: Option<String>,
        #[serde(default)]
        uuid: Option<String>,
    },

    /// Conversation title update.
    #[serde(rename = "title")]
    Title {
        #[serde(default)]
        title: Option<String>,
    },

    /// Model reasoning trace.
    #[serde(rename = "reasoning")]
    Reasoning {
        #[serde(default)]
        subtype: Option<String>,
        #[serde(default)]
        token: Option<String>,
    },

    #[serde(rename = "error")]
    Error {
        #[serde(default, alias = "message")]
        cause: String,
    },

    /// Any event type this gateway does not know.
    #[serde(other)]
    Unknown,
}

impl StreamEvent {
    /// Wire name of the event, for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Status { .. } => "status",
            Self::TokenDelta { .. } => "stream",
            Self::FinalAnswer { .. } => "finalAnswer",
            Self::FileAttachment { .. } => "file",
            Self::ToolEvent { .. } => "tool",
            Self::Title { .. } => "title",
            Self::Reasoning { .. } => "reasoning",
            Self::Error { .. } => "error",
            Self::Unknown => "unknown",
        }
    }

    /// A generated image the caller can fetch: webp with a known digest.
    pub fn image_sha(&self) -> Option<&str> {
        match self {
            Self::FileAttachment { sha, mime, .. } if mime == IMAGE_WEBP && !sha.is_empty() => {
                Some(sha)
            },
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> StreamEvent {
        serde_json::from_str(line).expect("valid event")
    }

    #[test]
    fn test_parse_feed_lines() {
        assert_eq!(
            parse(r#"{"type":"stream","token":"He"}"#),
            StreamEvent::TokenDelta { token: "He".to_string() }
        );
        assert_eq!(
            parse(r#"{"type":"finalAnswer","text":"Hello","interrupted":false}"#),
            StreamEvent::FinalAnswer { text: "Hello".to_string() }
        );
        assert_eq!(
            parse(r#"{"type":"status","status":"started"}"#),
            StreamEvent::Status { status: Some("started".to_string()), message: None }
        );
        assert_eq!(
            parse(r#"{"type":"error","message":"model overloaded"}"#),
            StreamEvent::Error { cause: "model overloaded".to_string() }
        );
    }

    #[test]
    fn test_unknown_event_is_absorbed() {
        assert_eq!(parse(r#"{"type":"routerMetadata","route":"x"}"#), StreamEvent::Unknown);
    }

    #[test]
    fn test_image_sha() {
        let webp = parse(r#"{"type":"file","name":"a.webp","sha":"abc","mime":"image/webp"}"#);
        assert_eq!(webp.image_sha(), Some("abc"));

        let png = parse(r#"{"type":"file","name":"a.png","sha":"abc","mime":"image/png"}"#);
        assert_eq!(png.image_sha(), None);
    }
}
