use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    middleware::from_fn,
    response::IntoResponse,
    routing::get,
};
use serde_json::json;

use crate::{
    auth, deck, flashcard,
    metrics::{metrics_handler, track_metrics},
    middleware::request_id::request_id_middleware,
    state::ApiState,
    user, words,
};

pub fn router() -> Router<ApiState> {
    Router::new()
        .route("/s/health", get(health))
        .route("/metrics", get(metrics_handler))
        .merge(auth::routes())
        .merge(user::routes())
        .merge(flashcard::routes())
        .merge(deck::routes())
        .merge(words::routes())
        .fallback(handler_404)
        .layer(from_fn(track_metrics))
        .layer(from_fn(request_id_middleware))
}

/// Service health report. Always 200; a broken database shows up in the
/// status field, not the status code.
async fn health(State(state): State<ApiState>) -> Json<serde_json::Value> {
    let status = match verba_db::ping(&state.pool).await {
        Ok(()) => "OK",
        Err(err) => {
            tracing::warn!("health ping failed: {err}");
            "DB-ISSUE"
        }
    };

    Json(json!({
        "name": "flashcard",
        "version": env!("CARGO_PKG_VERSION"),
        "status": status
    }))
}

async fn handler_404() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "The requested resource was not found" })),
    )
}
