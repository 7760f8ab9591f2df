//! Unified error type for gateway operations.

use axum::http::StatusCode;
use hugchat_types::{AuthError, DecodeError};
use serde::Serialize;
use thiserror::Error;

/// Main error type for all gateway operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum GatewayError {
    /// A node-graph payload had an unexpected shape.
    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    /// Credentials were rejected, a login step failed, or a raw token cannot be refreshed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// The remote session is no longer valid. Triggers one refresh-and-retry.
    #[error("Unauthorized by remote")]
    Unauthorized,

    /// The remote answered with an unexpected status.
    #[error("Remote returned HTTP {status}: {body}")]
    RemoteHttp {
        /// Status code returned by the remote
        status: u16,
        /// Leading part of the response body
        body: String,
    },

    /// Malformed feed line or an explicit error event from the remote feed.
    #[error("Stream error: {0}")]
    Stream(String),

    /// The inbound client went away while a stream was being rendered.
    #[error("SSE client disconnected")]
    ClientDisconnected,

    /// The inbound request could not be understood.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Network request failed (HTTP client).
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// File system I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl GatewayError {
    /// Status code used when this error reaches the HTTP boundary.
    pub fn http_status(&self) -> StatusCode {
        match self {
            Self::Auth(_) | Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::RemoteHttp { .. } | Self::Stream(_) | Self::Network(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }
}

impl Serialize for GatewayError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.to_string().as_str())
    }
}

/// Result type alias for gateway operations.
pub type GatewayResult<T> = Result<T, GatewayError>;
