use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Uuid;
use verba_db::models::Flashcard;

/// Wire form of a flashcard.
///
/// The stored `word` column holds the term in the target language and
/// `meaning` its native translation; the JSON field names spell that out
/// for API clients.
#[derive(Debug, Clone, Serialize)]
pub struct FlashcardResponse {
    /// Flashcard ID
    pub id: Uuid,
    /// ISO language code of the learner's native language
    #[serde(skip_serializing_if = "Option::is_none")]
    pub native_lang: Option<String>,
    /// ISO language code of the language being learned
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_lang: Option<String>,
    /// The term being learned
    #[serde(rename = "word_in_target")]
    pub word: String,
    /// Its translation
    #[serde(rename = "word_in_native")]
    pub meaning: String,
    /// Example sentences
    #[serde(rename = "usage")]
    pub usage_examples: Vec<String>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl From<Flashcard> for FlashcardResponse {
    fn from(flashcard: Flashcard) -> Self {
        Self {
            id: flashcard.id,
            native_lang: flashcard.native_lang,
            target_lang: flashcard.target_lang,
            word: flashcard.word,
            meaning: flashcard.meaning,
            usage_examples: flashcard.usage_examples,
            created_at: flashcard.created_at,
        }
    }
}

/// Request payload for creating a flashcard
#[derive(Debug, Deserialize)]
pub struct NewFlashcardRequest {
    pub native_lang: Option<String>,
    pub target_lang: Option<String>,
    pub content: FlashcardContent,
}

/// The card content itself, nested under `content` in the request body
#[derive(Debug, Deserialize)]
pub struct FlashcardContent {
    pub word_in_native: String,
    pub word_in_target: String,
    #[serde(default)]
    pub usage: Vec<String>,
}

/// Request payload for a partial flashcard update. Absent fields keep their
/// stored value.
#[derive(Debug, Deserialize)]
pub struct UpdateFlashcardRequest {
    pub id: Uuid,
    pub native_lang: Option<String>,
    pub target_lang: Option<String>,
    pub word_in_native: Option<String>,
    pub word_in_target: Option<String>,
    pub usage: Option<Vec<String>>,
}
