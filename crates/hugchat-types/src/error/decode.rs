//! Node-graph decoding errors.

use serde::Serialize;
use thiserror::Error;

/// Errors raised while reconstructing records from a node-graph payload.
#[derive(Debug, Clone, Error, Serialize, PartialEq, Eq)]
#[serde(tag = "type", content = "details")]
pub enum DecodeError {
    /// The payload held no chunk or node whose `type` is `"data"`.
    #[error("No data node in response")]
    NoData,

    /// A dereferenced position held the wrong JSON kind.
    #[error("Unexpected shape at {path}: expected {expected}")]
    Shape {
        /// Location inside the graph, e.g. `data[12].children[0]`
        path: String,
        /// JSON kind the decoder needed at that location
        expected: &'static str,
    },

    /// An index pointed outside the flat `data` array.
    #[error("Index {index} out of range at {path} (graph holds {len} values)")]
    IndexOutOfRange {
        /// Location of the offending index
        path: String,
        /// The index read from the graph
        index: usize,
        /// Length of the flat array
        len: usize,
    },

    /// The payload was not valid JSON, even after re-framing.
    #[error("Malformed payload: {message}")]
    Malformed {
        /// Parser message
        message: String,
    },
}

impl DecodeError {
    pub fn shape(path: impl Into<String>, expected: &'static str) -> Self {
        Self::Shape { path: path.into(), expected }
    }
}
