use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::models::{Deck, Flashcard};

pub async fn create_deck<'e, E>(executor: E, name: &str, owner: Uuid) -> Result<Deck, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            INSERT INTO decks (name, owner)
            VALUES ($1, $2)
            RETURNING id, name, owner, created_at
        "#,
    )
    .bind(name)
    .bind(owner)
    .fetch_one(executor)
    .await
}

pub async fn find_deck_by_id<'e, E>(executor: E, deck_id: Uuid) -> Result<Option<Deck>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT id, name, owner, created_at
            FROM decks
            WHERE id = $1
        "#,
    )
    .bind(deck_id)
    .fetch_optional(executor)
    .await
}

pub async fn find_decks_by_owner<'e, E>(executor: E, owner: Uuid) -> Result<Vec<Deck>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT id, name, owner, created_at
            FROM decks
            WHERE owner = $1
            ORDER BY created_at DESC
        "#,
    )
    .bind(owner)
    .fetch_all(executor)
    .await
}

pub async fn find_decks_by_name<'e, E>(
    executor: E,
    owner: Uuid,
    name: &str,
) -> Result<Vec<Deck>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT id, name, owner, created_at
            FROM decks
            WHERE owner = $1 AND name = $2
            ORDER BY created_at DESC
        "#,
    )
    .bind(owner)
    .bind(name)
    .fetch_all(executor)
    .await
}

/// Rename is owner-scoped so a caller can never touch a foreign deck.
pub async fn rename_deck<'e, E>(
    executor: E,
    deck_id: Uuid,
    owner: Uuid,
    name: &str,
) -> Result<Option<Deck>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            UPDATE decks
            SET name = $3
            WHERE id = $1 AND owner = $2
            RETURNING id, name, owner, created_at
        "#,
    )
    .bind(deck_id)
    .bind(owner)
    .bind(name)
    .fetch_optional(executor)
    .await
}

pub async fn delete_deck<'e, E>(executor: E, deck_id: Uuid, owner: Uuid) -> Result<bool, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    let result = sqlx::query(
        // language=PostgreSQL
        r#"
            DELETE FROM decks
            WHERE id = $1 AND owner = $2
        "#,
    )
    .bind(deck_id)
    .bind(owner)
    .execute(executor)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Adding a card twice is a no-op, not an error.
pub async fn add_to_deck<'e, E>(
    executor: E,
    deck_id: Uuid,
    flashcard_id: Uuid,
) -> Result<(), sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query(
        // language=PostgreSQL
        r#"
            INSERT INTO flashcard_decks (deck_id, flashcard_id)
            VALUES ($1, $2)
            ON CONFLICT (deck_id, flashcard_id) DO NOTHING
        "#,
    )
    .bind(deck_id)
    .bind(flashcard_id)
    .execute(executor)
    .await?;
    Ok(())
}

pub async fn remove_from_deck<'e, E>(
    executor: E,
    deck_id: Uuid,
    flashcard_id: Uuid,
) -> Result<bool, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    let result = sqlx::query(
        // language=PostgreSQL
        r#"
            DELETE FROM flashcard_decks
            WHERE deck_id = $1 AND flashcard_id = $2
        "#,
    )
    .bind(deck_id)
    .bind(flashcard_id)
    .execute(executor)
    .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn list_deck_flashcards<'e, E>(
    executor: E,
    deck_id: Uuid,
) -> Result<Vec<Flashcard>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT f.id, f.word, f.meaning, f.usage_examples, f.native_lang, f.target_lang, f.created_at
            FROM flashcards f
            JOIN flashcard_decks fd ON fd.flashcard_id = f.id
            WHERE fd.deck_id = $1
            ORDER BY f.created_at
        "#,
    )
    .bind(deck_id)
    .fetch_all(executor)
    .await
}
