use axum::Router;
use tower_governor::{
    GovernorLayer, governor::GovernorConfigBuilder, key_extractor::SmartIpKeyExtractor,
};

/// Strict rate limiting for authentication endpoints.
/// 5 requests per second with burst of 10 (prevents brute force attacks).
///
/// Keyed by client IP, read from `x-forwarded-for` when a proxy sets it and
/// falling back to the peer address otherwise.
pub fn apply_auth_rate_limit<S>(router: Router<S>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    let governor_conf = GovernorConfigBuilder::default()
        .key_extractor(SmartIpKeyExtractor)
        .per_second(5)
        .burst_size(10)
        .use_headers()
        .finish()
        .expect("Failed to build auth rate limiter configuration");

    router.layer(GovernorLayer::new(governor_conf))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Router, body::Body, http::Request, http::StatusCode, routing::get};
    use tower::ServiceExt;

    async fn test_handler() -> &'static str {
        "OK"
    }

    #[tokio::test]
    async fn test_request_with_forwarded_ip_passes() {
        let app: Router = apply_auth_rate_limit(Router::new().route("/", get(test_handler)));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/")
                    .header("x-forwarded-for", "127.0.0.1")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().get("x-ratelimit-limit").is_some());
    }
}
