//! # HuggingChat Types
//!
//! Core types, models, and error definitions for the HuggingChat gateway.
//!
//! This crate provides the foundational type system for the gateway:
//!
//! - **`error`** - Typed errors for node-graph decoding and authentication
//! - **`models`** - Domain models (Identity, cookies, models, conversations, stream events)
//! - **`protocol`** - OpenAI ChatCompletions wire types
//!
//! ## Architecture Role
//!
//! `hugchat-types` sits at the bottom of the dependency graph:
//!
//! ```text
//!        hugchat-types (this crate)
//!                │
//!                ▼
//!          hugchat-core
//!                │
//!                ▼
//!         hugchat-server
//! ```
//!
//! Nothing in here performs I/O.

pub mod error;
pub mod models;
pub mod protocol;

pub use error::{AuthError, DecodeError};

pub use models::{
    ConversationDetail, ConversationSummary, Identity, Message, ModelInfo, SessionCookie,
    StreamEvent,
};
