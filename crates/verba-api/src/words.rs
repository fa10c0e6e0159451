use std::time::Duration;

use axum::{Json, Router, extract::State, routing::get};

use crate::{ApiState, auth::AuthUser, error::ApiError};

const UPSTREAM_TIMEOUT: Duration = Duration::from_secs(10);

/// Create the random word routes
pub fn routes() -> Router<ApiState> {
    Router::new().route("/randomword", get(random_word))
}

/// Fetch a random word from the upstream dictionary service and pass its
/// JSON body through untouched.
async fn random_word(
    _auth_user: AuthUser,
    State(state): State<ApiState>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let response = state
        .http_client
        .get(&state.random_word_url)
        .timeout(UPSTREAM_TIMEOUT)
        .send()
        .await
        .map_err(|err| ApiError::Upstream(format!("request failed: {err}")))?;

    if !response.status().is_success() {
        return Err(ApiError::Upstream(format!(
            "unexpected status {}",
            response.status()
        )));
    }

    let body = response
        .json::<serde_json::Value>()
        .await
        .map_err(|err| ApiError::Upstream(format!("invalid response body: {err}")))?;

    Ok(Json(body))
}
