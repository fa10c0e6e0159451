use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiError;

/// Claims carried by an access token. `sub` holds the user id.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub login: String,
    pub exp: usize,
    pub iat: usize,
}

impl Claims {
    /// The `sub` claim parsed back into a user id.
    pub fn user_id(&self) -> Result<Uuid, ApiError> {
        Uuid::parse_str(&self.sub).map_err(|_| ApiError::Auth("Invalid token subject".to_string()))
    }
}

/// Sign an access token for the given user.
pub fn generate_jwt_token(
    user_id: Uuid,
    login: String,
    jwt_secret: &str,
    expiry_hours: i64,
) -> Result<String, ApiError> {
    let issued_at = Utc::now();
    let expires_at = issued_at + Duration::hours(expiry_hours);
    let claims = Claims {
        sub: user_id.to_string(),
        login,
        iat: issued_at.timestamp() as usize,
        exp: expires_at.timestamp() as usize,
    };

    let key = EncodingKey::from_secret(jwt_secret.as_bytes());
    Ok(jsonwebtoken::encode(&Header::default(), &claims, &key)?)
}

/// Decode and verify an access token, including its expiry.
pub fn verify_jwt_token(token: &str, jwt_secret: &str) -> Result<Claims, ApiError> {
    let key = DecodingKey::from_secret(jwt_secret.as_bytes());
    jsonwebtoken::decode::<Claims>(token, &key, &Validation::default())
        .map(|data| data.claims)
        .map_err(|_| ApiError::Auth("Invalid or expired token".to_string()))
}
