use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Account row. The login is unique and the password is stored as a bcrypt hash.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Unique user identifier
    pub id: Uuid,
    /// Login name, unique across accounts
    pub login: String,
    /// bcrypt hash of the password, never the password itself
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// When the account was created
    pub created_at: DateTime<Utc>,
}

/// Vocabulary card. A card carries no owner of its own; ownership is reached
/// through deck membership in `flashcard_decks`.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Flashcard {
    /// Unique card identifier
    pub id: Uuid,
    /// The term in the language being learned
    pub word: String,
    /// The term in the learner's own language
    pub meaning: String,
    /// Example sentences showing the word in use
    pub usage_examples: Vec<String>,
    /// Language code of the learner's language, when the client sent one
    pub native_lang: Option<String>,
    /// Language code of the language being learned, when the client sent one
    pub target_lang: Option<String>,
    /// When the card was created
    pub created_at: DateTime<Utc>,
}

/// Named collection of flashcards owned by a single user.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Deck {
    /// Unique deck identifier
    pub id: Uuid,
    /// Deck name (max 255 chars)
    pub name: String,
    /// Owning user
    pub owner: Uuid,
    /// When the deck was created
    pub created_at: DateTime<Utc>,
}

/// Stored refresh token. Only the SHA-256 hash of the token ever reaches the
/// database; the token itself goes to the client once.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RefreshToken {
    /// Unique token identifier
    pub id: Uuid,
    /// User this token belongs to
    pub user_id: Uuid,
    /// Hex-encoded SHA-256 hash of the token
    pub token_hash: String,
    /// Expiry; rows past this point are swept by the cleanup job
    pub expires_at: DateTime<Utc>,
}
