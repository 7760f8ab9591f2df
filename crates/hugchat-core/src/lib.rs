//! # HuggingChat Core
//!
//! An OpenAI-compatible facade over HuggingChat, which has no public API.
//!
//! ## Architecture
//!
//! ```text
//! hugchat-core/src/
//! ├── graph/      # __data.json node-graph decoder
//! ├── session/    # cookie store, login handshake, credential providers
//! ├── remote/     # HugChatApi seam + reqwest RemoteClient, NDJSON lines
//! ├── chat/       # ChatSession: login probe, conversation pick, turn submit
//! ├── translate/  # event feed → chat.completion / SSE chunks
//! └── server/     # axum router, handlers, middleware
//! ```
//!
//! One inbound request builds one `ChatSession`. Remote calls that come back
//! unauthorized are refreshed and retried once per session.

#![cfg_attr(test, allow(clippy::panic, clippy::indexing_slicing))]

pub mod chat;
pub mod error;
pub mod graph;
pub mod remote;
pub mod server;
pub mod session;
pub mod translate;

#[cfg(test)]
pub(crate) mod test_support;

pub use error::{GatewayError, GatewayResult};
pub use server::{build_router, AppState};
