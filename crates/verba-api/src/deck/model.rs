use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::types::Uuid;
use verba_db::models::Deck;

/// Wire form of a deck. The owner column stays internal; every deck a caller
/// can see is their own.
#[derive(Debug, Clone, Serialize)]
pub struct DeckResponse {
    /// Deck ID
    pub id: Uuid,
    /// Deck name
    pub name: String,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl From<Deck> for DeckResponse {
    fn from(deck: Deck) -> Self {
        Self {
            id: deck.id,
            name: deck.name,
            created_at: deck.created_at,
        }
    }
}
