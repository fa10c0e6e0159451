use axum::http::{HeaderValue, Method, header};
use tower_http::cors::{AllowOrigin, CorsLayer};

/// Cross-origin policy for browser clients.
///
/// With an empty origin list the layer allows no cross-origin callers, which
/// is the right default for a token-authenticated API.
pub fn create_cors_layer(allowed_origins: Vec<String>) -> CorsLayer {
    let mut origins = Vec::with_capacity(allowed_origins.len());
    for origin in allowed_origins {
        match origin.parse::<HeaderValue>() {
            Ok(value) => origins.push(value),
            Err(_) => tracing::warn!(%origin, "skipping unparseable CORS origin"),
        }
    }

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT, header::AUTHORIZATION])
}
