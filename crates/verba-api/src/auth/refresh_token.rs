use base64::Engine;
use chrono::Utc;
use rand::Rng;
use sha2::{Digest, Sha256};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::ApiError;

use verba_db::repositories::token as token_repo;

/// Generate a cryptographically secure random refresh token
/// Returns the token string (to send to client) and its SHA-256 hash (to store in DB)
pub fn generate_refresh_token() -> (String, String) {
    // Generate 32 random bytes (256 bits)
    let mut token_bytes = [0u8; 32];
    rand::thread_rng().fill(&mut token_bytes);

    // Encode as base64 for safe transmission
    let token = base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(token_bytes);

    let token_hash = hash_refresh_token(&token);

    (token, token_hash)
}

/// Hash a refresh token the way it is stored in the database.
pub fn hash_refresh_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token);
    format!("{:x}", hasher.finalize())
}

/// Store a freshly generated refresh token and return the client-facing string
pub async fn issue_refresh_token(
    pool: &PgPool,
    user_id: Uuid,
    expiry_days: i64,
) -> Result<String, ApiError> {
    let (token, token_hash) = generate_refresh_token();
    let expires_at = Utc::now() + chrono::Duration::days(expiry_days);

    token_repo::store_refresh_token(pool, user_id, &token_hash, expires_at).await?;

    Ok(token)
}

/// Verify a refresh token and rotate it, returning the user id and the
/// replacement token
///
/// Rotation runs in a transaction: the presented token is revoked and the new
/// one stored atomically, so a token can never be redeemed twice.
pub async fn verify_and_rotate_refresh_token(
    pool: &PgPool,
    token: &str,
    expiry_days: i64,
) -> Result<(Uuid, String), ApiError> {
    let token_hash = hash_refresh_token(token);

    // Start a transaction for atomic token rotation
    let mut tx = pool.begin().await?;

    // Fetch the token; the query already filters out expired rows
    let record = token_repo::find_valid_refresh_token(&mut *tx, &token_hash)
        .await?
        .ok_or_else(|| ApiError::Auth("Invalid refresh token".to_string()))?;

    // Token is valid - revoke it
    token_repo::revoke_refresh_token(&mut *tx, record.id).await?;

    // Generate and store the replacement
    let (new_token, new_token_hash) = generate_refresh_token();
    let new_expires_at = Utc::now() + chrono::Duration::days(expiry_days);

    token_repo::store_refresh_token(&mut *tx, record.user_id, &new_token_hash, new_expires_at)
        .await?;

    tx.commit().await?;

    Ok((record.user_id, new_token))
}

/// Revoke all refresh tokens for a user (logout from all devices)
pub async fn revoke_all_user_tokens(pool: &PgPool, user_id: Uuid) -> Result<u64, ApiError> {
    let rows = token_repo::revoke_all_for_user(pool, user_id).await?;
    Ok(rows)
}

/// Clean up expired refresh tokens (run periodically by the background job)
pub async fn cleanup_expired_tokens(pool: &PgPool) -> Result<u64, ApiError> {
    let rows = token_repo::delete_expired_tokens(pool).await?;
    Ok(rows)
}
