use axum::http::Method;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};

/// Permissive CORS: any origin, the three methods the API serves.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any)
        .max_age(Duration::from_secs(3600))
}
