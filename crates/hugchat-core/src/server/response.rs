use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use hugchat_types::protocol::{ErrorBody, ErrorDetail};

use crate::error::GatewayError;

/// Errors reach the client as an OpenAI-shaped body with the canonical
/// status text only. The full error stays in the server log.
impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.http_status();
        tracing::error!("[Server] Request failed with {}: {}", status.as_u16(), self);

        let body = ErrorBody {
            error: ErrorDetail {
                message: status.canonical_reason().unwrap_or("Error").to_string(),
                kind: error_kind(status).to_string(),
                code: status.as_u16(),
            },
        };
        (status, Json(body)).into_response()
    }
}

fn error_kind(status: StatusCode) -> &'static str {
    match status {
        StatusCode::BAD_REQUEST => "invalid_request_error",
        StatusCode::UNAUTHORIZED => "authentication_error",
        _ => "server_error",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hugchat_types::AuthError;

    #[test]
    fn test_error_kind_by_status() {
        assert_eq!(error_kind(StatusCode::BAD_REQUEST), "invalid_request_error");
        assert_eq!(error_kind(StatusCode::UNAUTHORIZED), "authentication_error");
        assert_eq!(error_kind(StatusCode::BAD_GATEWAY), "server_error");
    }

    #[test]
    fn test_response_status_follows_error() {
        let response = GatewayError::from(AuthError::MissingCredential).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let response = GatewayError::Stream("boom".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }
}
