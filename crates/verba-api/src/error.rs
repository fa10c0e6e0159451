use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// Postgres error code for unique constraint violations.
const UNIQUE_VIOLATION: &str = "23505";

/// Postgres error code for foreign key violations.
const FOREIGN_KEY_VIOLATION: &str = "23503";

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Auth(String),
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("{0}")]
    Conflict(String),
    #[error("JWT error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("upstream error: {0}")]
    Upstream(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    /// Status code this error maps to on the wire.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Auth(_) => StatusCode::UNAUTHORIZED,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Upstream(_) => StatusCode::BAD_GATEWAY,
            Self::Database(err) => match err {
                sqlx::Error::RowNotFound => StatusCode::NOT_FOUND,
                err if is_unique_violation(err) => StatusCode::CONFLICT,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Jwt(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message placed in the response envelope. Server-side faults get a
    /// generic message; the real cause only goes to the logs.
    fn client_message(&self) -> String {
        match self {
            Self::Validation(msg) | Self::Auth(msg) | Self::Conflict(msg) => msg.clone(),
            Self::NotFound(what) => format!("{what} not found"),
            Self::Upstream(_) => "upstream service unavailable".to_string(),
            Self::Database(err) => match err {
                sqlx::Error::RowNotFound => "resource not found".to_string(),
                err if is_unique_violation(err) => "resource already exists".to_string(),
                _ => "internal server error".to_string(),
            },
            Self::Jwt(_) | Self::Internal(_) => "internal server error".to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        match &self {
            Self::Database(err) if status == StatusCode::INTERNAL_SERVER_ERROR => {
                tracing::error!("database error: {err}");
            }
            Self::Jwt(err) => {
                tracing::error!("JWT error: {err}");
            }
            Self::Internal(err) => {
                tracing::error!("internal error: {err:#}");
            }
            Self::Upstream(msg) => {
                tracing::warn!("upstream error: {msg}");
            }
            _ => {}
        }

        (status, Json(json!({ "error": self.client_message() }))).into_response()
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .and_then(|db_err| db_err.code())
        .is_some_and(|code| code == UNIQUE_VIOLATION)
}

/// True when the error is a broken row reference, e.g. attaching a flashcard
/// that does not exist.
pub(crate) fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .and_then(|db_err| db_err.code())
        .is_some_and(|code| code == FOREIGN_KEY_VIOLATION)
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    #[test]
    fn test_validation_maps_to_bad_request() {
        let err = ApiError::Validation("login is too short".to_string());
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_auth_maps_to_unauthorized() {
        let err = ApiError::Auth("Not authenticated".to_string());
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_not_found_message_names_the_resource() {
        let err = ApiError::NotFound("flashcard");
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.to_string(), "flashcard not found");
    }

    #[test]
    fn test_row_not_found_maps_to_not_found() {
        let err = ApiError::Database(sqlx::Error::RowNotFound);
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_internal_errors_hide_details() {
        let err = ApiError::Internal(anyhow::anyhow!("connection refused to 10.0.0.3"));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.client_message(), "internal server error");
    }

    #[test]
    fn test_upstream_maps_to_bad_gateway() {
        let err = ApiError::Upstream("timed out".to_string());
        assert_eq!(err.status_code(), StatusCode::BAD_GATEWAY);
        assert_eq!(err.client_message(), "upstream service unavailable");
    }

    #[tokio::test]
    async fn test_error_envelope_shape() {
        let response = ApiError::Validation("missing required fields".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "missing required fields");
    }
}
