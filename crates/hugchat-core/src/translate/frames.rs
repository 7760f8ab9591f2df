//! SSE frame formatting for incremental responses.

use hugchat_types::protocol::{ChatCompletionChunk, ChunkChoice, Delta};

/// Literal end-of-stream sentinel frame.
pub const DONE_FRAME: &str = "data: [DONE]\n\n";

/// Identity shared by every chunk of one response.
#[derive(Debug, Clone)]
pub struct ChunkHeader {
    pub id: String,
    pub created: i64,
    pub model: String,
}

/// Wrap a chunk as one SSE `data:` frame.
pub fn sse_line(chunk: &ChatCompletionChunk) -> String {
    format!("data: {}\n\n", serde_json::to_string(chunk).unwrap_or_default())
}

/// Create a content delta chunk. Trailing NULs are stripped from `token`.
pub fn content_chunk(header: &ChunkHeader, token: &str) -> ChatCompletionChunk {
    chunk(
        header,
        Delta {
            role: Some("assistant".to_string()),
            content: Some(token.trim_end_matches('\0').to_string()),
        },
        None,
    )
}

/// Create the terminal chunk: empty delta, `finish_reason = "stop"`.
pub fn stop_chunk(header: &ChunkHeader) -> ChatCompletionChunk {
    chunk(header, Delta::default(), Some("stop".to_string()))
}

fn chunk(header: &ChunkHeader, delta: Delta, finish_reason: Option<String>) -> ChatCompletionChunk {
    ChatCompletionChunk {
        id: header.id.clone(),
        object: "chat.completion.chunk".to_string(),
        created: header.created,
        model: header.model.clone(),
        choices: vec![ChunkChoice { index: 0, delta, finish_reason }],
    }
}
