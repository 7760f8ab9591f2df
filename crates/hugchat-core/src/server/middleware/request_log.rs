use axum::{
    extract::Request,
    http::HeaderMap,
    middleware::Next,
    response::Response,
};

/// Log method, client address and path of every inbound request.
pub async fn request_log_middleware(request: Request, next: Next) -> Response {
    tracing::info!(
        "[Request] {} {} {}",
        request.method(),
        client_ip(request.headers()),
        request.uri().path()
    );
    next.run(request).await
}

/// `X-Real-IP`, else the first `X-Forwarded-For` hop, else `-`.
fn client_ip(headers: &HeaderMap) -> String {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
    };

    if let Some(ip) = header("x-real-ip") {
        return ip.to_string();
    }
    header("x-forwarded-for")
        .and_then(|v| v.split(',').next())
        .map(|hop| hop.trim().to_string())
        .unwrap_or_else(|| "-".to_string())
}
