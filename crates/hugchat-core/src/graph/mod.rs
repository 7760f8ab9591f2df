//! Decoder for the remote application's `__data.json` node-graph payloads.
//!
//! Payloads arrive either as one JSON object with a `nodes` array, or as
//! several top-level JSON objects written back to back. Records are
//! reconstructed from the flat `data` array of the selected node through
//! [`NodeGraph`].

mod node_graph;
mod schema;

pub use node_graph::NodeGraph;
pub use schema::{
    decode_detail, decode_detail_after_create, decode_listing, DetailPage, Listing,
    CONVERSATION_DEPENDENCY_SUFFIX,
};

use hugchat_types::DecodeError;
use serde_json::Value;

/// Split a payload of back-to-back JSON objects into its chunks.
///
/// Whitespace between objects is allowed. A single object yields one chunk.
pub fn split_concatenated(text: &str) -> Result<Vec<Value>, DecodeError> {
    serde_json::Deserializer::from_str(text)
        .into_iter::<Value>()
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| DecodeError::Malformed { message: e.to_string() })
}

/// Whether a chunk or node carries `"type": <kind>`.
pub(crate) fn has_type(value: &Value, kind: &str) -> bool {
    value.get("type").and_then(Value::as_str) == Some(kind)
}
