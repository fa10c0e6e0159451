use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use uuid::Uuid;

use super::jwt::verify_jwt_token;
use crate::{error::ApiError, state::AuthConfig};

/// Extractor for handlers that require a signed-in caller.
///
/// Pulls the bearer token out of the `Authorization` header, verifies it and
/// exposes the caller's identity. Routes that take this argument reject
/// unauthenticated requests with 401 before the handler body runs.
///
/// # Example
/// ```
/// use axum::extract::State;
/// use verba_api::{error::ApiError, auth::AuthUser, ApiState};
///
///
/// async fn protected_route(
///     auth_user: AuthUser,
///     State(state): State<ApiState>,
/// ) -> Result<(), ApiError> {
///     // auth_user.user_id and auth_user.login are available
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub login: String,
}

impl<S> FromRequestParts<S> for AuthUser
where
    AuthConfig: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth = AuthConfig::from_ref(state);

        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| ApiError::Auth("Not authenticated".to_string()))?;

        let claims = verify_jwt_token(bearer.token(), &auth.jwt_secret)?;

        Ok(Self {
            user_id: claims.user_id()?,
            login: claims.login,
        })
    }
}
