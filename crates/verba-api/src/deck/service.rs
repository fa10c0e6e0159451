use sqlx::PgPool;
use sqlx::types::Uuid;
use verba_db::{models::Deck, repositories::deck as deck_repo};

use crate::error::ApiError;

/// Fetch a deck and check that it belongs to `owner`.
///
/// A foreign deck reads as missing, so callers cannot probe which deck IDs
/// exist.
pub async fn require_owned_deck(
    pool: &PgPool,
    deck_id: Uuid,
    owner: Uuid,
) -> Result<Deck, ApiError> {
    deck_repo::find_deck_by_id(pool, deck_id)
        .await?
        .filter(|deck| deck.owner == owner)
        .ok_or(ApiError::NotFound("deck"))
}
