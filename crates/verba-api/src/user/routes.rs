use axum::{
    Json, Router,
    extract::State,
    routing::{delete, get, put},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::types::Uuid;
use verba_db::{
    models::User,
    repositories::{token as token_repo, user as user_repo},
};

use crate::{ApiState, auth::AuthUser, auth::password, error::ApiError, validation};

/// Create the account profile routes
pub fn routes() -> Router<ApiState> {
    Router::new()
        .route("/user", get(get_account))
        .route("/user", put(update_account))
        .route("/user", delete(delete_account))
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub login: String,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            login: user.login,
            created_at: user.created_at,
        }
    }
}

#[derive(Deserialize)]
struct UpdateAccountRequest {
    login: Option<String>,
    password: Option<String>,
}

/// Get the authenticated account's profile
async fn get_account(
    auth_user: AuthUser,
    State(state): State<ApiState>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = user_repo::find_user_by_id(&state.pool, auth_user.user_id)
        .await?
        .ok_or_else(|| ApiError::Auth("Account no longer exists".to_string()))?;

    Ok(Json(UserResponse::from(user)))
}

/// Update login and/or password of the authenticated account
async fn update_account(
    auth_user: AuthUser,
    State(state): State<ApiState>,
    Json(payload): Json<UpdateAccountRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    if payload.login.is_none() && payload.password.is_none() {
        return Err(ApiError::Validation("No fields to update".to_string()));
    }
    if let Some(login) = &payload.login {
        validation::validate_login(login)?;
    }
    if let Some(pw) = &payload.password {
        validation::validate_password(pw)?;
    }

    let user = user_repo::find_user_by_id(&state.pool, auth_user.user_id)
        .await?
        .ok_or_else(|| ApiError::Auth("Account no longer exists".to_string()))?;

    if let Some(login) = &payload.login {
        if *login != user.login && user_repo::login_exists(&state.pool, login).await? {
            return Err(ApiError::Conflict(
                "An account with this login already exists".to_string(),
            ));
        }
    }

    let password_hash = match payload.password {
        Some(pw) => Some(password::hash_password(pw, state.auth.bcrypt_cost).await?),
        None => None,
    };

    let mut tx = state.pool.begin().await?;
    let mut updated = user;
    if let Some(login) = &payload.login {
        updated = user_repo::update_user_login(&mut *tx, auth_user.user_id, login)
            .await?
            .ok_or(ApiError::NotFound("user"))?;
    }
    if let Some(hash) = &password_hash {
        updated = user_repo::update_user_password(&mut *tx, auth_user.user_id, hash)
            .await?
            .ok_or(ApiError::NotFound("user"))?;
        // A password change signs out every session.
        token_repo::revoke_all_for_user(&mut *tx, auth_user.user_id).await?;
    }
    tx.commit().await?;

    Ok(Json(json!({
        "message": "Account updated successfully",
        "user": UserResponse::from(updated)
    })))
}

/// Delete the authenticated account
///
/// Decks, deck memberships and refresh tokens go with it through foreign key
/// cascades. Flashcards are shared rows and stay.
async fn delete_account(
    auth_user: AuthUser,
    State(state): State<ApiState>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let deleted = user_repo::delete_user(&state.pool, auth_user.user_id).await?;
    if !deleted {
        return Err(ApiError::Auth("Account no longer exists".to_string()));
    }

    tracing::info!(user_id = %auth_user.user_id, "account deleted");

    Ok(Json(json!({
        "message": "Account deleted successfully",
        "id": auth_user.user_id
    })))
}
