use axum::http::Method;
use tower_http::cors::{Any, CorsLayer};

/// Cross-origin policy for the whole app
///
/// Any origin may call the API, so a client hosted elsewhere can still
/// submit `POST /create`.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::HEAD,
            Method::PUT,
            Method::PATCH,
            Method::POST,
            Method::DELETE,
        ])
        .allow_headers(Any)
}
