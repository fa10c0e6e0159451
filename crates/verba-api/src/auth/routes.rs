use axum::{Json, Router, extract::State, http::StatusCode, routing::post};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::types::Uuid;
use verba_db::repositories::{token as token_repo, user as user_repo};

use super::{jwt, middleware::AuthUser, password, refresh_token as rt};
use crate::{
    ApiState, error::ApiError, metrics::record_auth_event, middleware::rate_limit, validation,
};

pub fn routes() -> Router<ApiState> {
    // Credential endpoints get the strict limiter; brute force lands here.
    let credential_routes = rate_limit::apply_auth_rate_limit(
        Router::new()
            .route("/auth/signup", post(signup))
            .route("/auth/signin", post(signin)),
    );

    let token_routes = Router::new()
        .route("/auth/refresh", post(refresh))
        .route("/auth/logout", post(logout));

    Router::new().merge(credential_routes).merge(token_routes)
}

#[derive(Deserialize)]
struct CredentialsRequest {
    login: String,
    password: String,
}

#[derive(Debug, Deserialize)]
struct RefreshRequest {
    refresh_token: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub id: Uuid,
    pub token: String,
    pub refresh_token: String,
    pub expired_at: i64,
}

async fn signup(
    State(state): State<ApiState>,
    Json(payload): Json<CredentialsRequest>,
) -> Result<(StatusCode, Json<TokenResponse>), ApiError> {
    validation::validate_login(&payload.login)?;
    validation::validate_password(&payload.password)?;

    if user_repo::login_exists(&state.pool, &payload.login).await? {
        return Err(ApiError::Conflict(
            "An account with this login already exists".to_string(),
        ));
    }

    let password_hash = password::hash_password(payload.password, state.auth.bcrypt_cost).await?;

    // Create the account and its first refresh token atomically. A lost race
    // on the login column surfaces as a unique violation.
    let (refresh_token, refresh_token_hash) = rt::generate_refresh_token();
    let expires_at = Utc::now() + chrono::Duration::days(state.auth.refresh_token_expiry_days);

    let mut tx = state.pool.begin().await?;
    let user = user_repo::create_user(&mut *tx, &payload.login, &password_hash).await?;
    token_repo::store_refresh_token(&mut *tx, user.id, &refresh_token_hash, expires_at).await?;
    tx.commit().await?;

    // Generate JWT access token
    let token = jwt::generate_jwt_token(
        user.id,
        user.login.clone(),
        &state.auth.jwt_secret,
        state.auth.jwt_expiry_hours,
    )?;

    tracing::info!(user_id = %user.id, "new account created");
    record_auth_event("signup", true);

    Ok((
        StatusCode::CREATED,
        Json(TokenResponse {
            id: user.id,
            token,
            refresh_token,
            expired_at: token_expiry(state.auth.jwt_expiry_hours),
        }),
    ))
}

async fn signin(
    State(state): State<ApiState>,
    Json(payload): Json<CredentialsRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    // Unknown login and wrong password return the same error.
    let Some(user) = user_repo::find_user_by_login(&state.pool, &payload.login).await? else {
        record_auth_event("signin", false);
        return Err(ApiError::Auth("Invalid login or password".to_string()));
    };

    let password_ok =
        password::verify_password(payload.password, user.password_hash.clone()).await?;
    if !password_ok {
        record_auth_event("signin", false);
        return Err(ApiError::Auth("Invalid login or password".to_string()));
    }

    record_auth_event("signin", true);

    let refresh_token =
        rt::issue_refresh_token(&state.pool, user.id, state.auth.refresh_token_expiry_days).await?;

    let token = jwt::generate_jwt_token(
        user.id,
        user.login.clone(),
        &state.auth.jwt_secret,
        state.auth.jwt_expiry_hours,
    )?;

    Ok(Json(TokenResponse {
        id: user.id,
        token,
        refresh_token,
        expired_at: token_expiry(state.auth.jwt_expiry_hours),
    }))
}

async fn refresh(
    State(state): State<ApiState>,
    Json(payload): Json<RefreshRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    // Verify and rotate the refresh token
    let (user_id, new_refresh_token) = rt::verify_and_rotate_refresh_token(
        &state.pool,
        &payload.refresh_token,
        state.auth.refresh_token_expiry_days,
    )
    .await?;

    let user = user_repo::find_user_by_id(&state.pool, user_id)
        .await?
        .ok_or_else(|| ApiError::Auth("Account no longer exists".to_string()))?;

    let token = jwt::generate_jwt_token(
        user.id,
        user.login.clone(),
        &state.auth.jwt_secret,
        state.auth.jwt_expiry_hours,
    )?;

    Ok(Json(TokenResponse {
        id: user.id,
        token,
        refresh_token: new_refresh_token,
        expired_at: token_expiry(state.auth.jwt_expiry_hours),
    }))
}

async fn logout(
    auth_user: AuthUser,
    State(state): State<ApiState>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let revoked = rt::revoke_all_user_tokens(&state.pool, auth_user.user_id).await?;
    tracing::debug!(user_id = %auth_user.user_id, revoked, "logout");

    Ok(Json(
        serde_json::json!({ "message": "Logged out successfully" }),
    ))
}

/// Unix timestamp when a token minted now will expire. Mirrors the `exp`
/// claim written by `generate_jwt_token`.
fn token_expiry(expiry_hours: i64) -> i64 {
    (Utc::now() + chrono::Duration::hours(expiry_hours)).timestamp()
}
