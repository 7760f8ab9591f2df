//! StreamTranslator: render the internal event feed as an OpenAI response.
//!
//! Buffered mode drains the feed into one `chat.completion` document.
//! Incremental mode turns each token into an SSE frame as it arrives and
//! watches for the client going away while it waits.

mod buffered;
mod frames;
mod incremental;

pub use buffered::collect_completion;
pub use frames::{content_chunk, sse_line, stop_chunk, ChunkHeader, DONE_FRAME};
pub use incremental::pump_sse_frames;

use chrono::Utc;
use uuid::Uuid;

use crate::chat::TurnMeta;

/// `<domain>/chat/conversation/<id>/output/<sha>`: where a generated image is served.
pub fn image_output_url(domain: &str, conversation_id: &str, sha: &str) -> String {
    format!("{}/chat/conversation/{}/output/{}", domain.trim_end_matches('/'), conversation_id, sha)
}

/// Fresh response identity for a turn.
pub fn response_header(meta: &TurnMeta) -> ChunkHeader {
    ChunkHeader {
        id: format!("chatcmpl-{}", Uuid::new_v4()),
        created: Utc::now().timestamp(),
        model: meta.model.clone(),
    }
}
