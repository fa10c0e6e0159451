use crate::error::ApiError;

/// Hash a password with bcrypt.
///
/// Bcrypt is CPU-bound, so both hashing and verification run on the
/// blocking pool.
pub async fn hash_password(password: String, cost: u32) -> Result<String, ApiError> {
    let hash = tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
        .await
        .map_err(anyhow::Error::from)?
        .map_err(anyhow::Error::from)?;
    Ok(hash)
}

/// Check a password against a stored bcrypt hash.
pub async fn verify_password(password: String, hash: String) -> Result<bool, ApiError> {
    let matches = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
        .await
        .map_err(anyhow::Error::from)?
        .map_err(anyhow::Error::from)?;
    Ok(matches)
}
