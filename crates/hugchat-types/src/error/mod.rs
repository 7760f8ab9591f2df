//! Typed error definitions shared across the gateway.
//!
//! Both families are plain data (Clone + Serialize + PartialEq) so they can be
//! matched in tests and logged structurally. Transport-level failures live in
//! `hugchat-core`, which wraps these.

mod auth;
mod decode;

pub use auth::AuthError;
pub use decode::DecodeError;
