//! Inbound wire protocol.

pub mod openai;

pub use openai::{
    AssistantMessage, ChatCompletionChunk, ChatCompletionRequest, ChatCompletionResponse,
    ChatMessage, Choice, ChunkChoice, ContentPart, Delta, ErrorBody, ErrorDetail, ImageUrl,
    MessageContent, ModelEntry, ModelList, Usage,
};
