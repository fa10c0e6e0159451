use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::models::Flashcard;

pub async fn create_flashcard<'e, E>(
    executor: E,
    word: &str,
    meaning: &str,
    usage_examples: &[String],
    native_lang: Option<&str>,
    target_lang: Option<&str>,
) -> Result<Flashcard, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            INSERT INTO flashcards (word, meaning, usage_examples, native_lang, target_lang)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, word, meaning, usage_examples, native_lang, target_lang, created_at
        "#,
    )
    .bind(word)
    .bind(meaning)
    .bind(usage_examples)
    .bind(native_lang)
    .bind(target_lang)
    .fetch_one(executor)
    .await
}

pub async fn find_flashcard_by_id<'e, E>(
    executor: E,
    flashcard_id: Uuid,
) -> Result<Option<Flashcard>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT id, word, meaning, usage_examples, native_lang, target_lang, created_at
            FROM flashcards
            WHERE id = $1
        "#,
    )
    .bind(flashcard_id)
    .fetch_optional(executor)
    .await
}

pub async fn find_in_deck_by_word<'e, E>(
    executor: E,
    deck_id: Uuid,
    word: &str,
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
            WHERE fd.deck_id = $1 AND f.word = $2
            ORDER BY f.created_at
        "#,
    )
    .bind(deck_id)
    .bind(word)
    .fetch_all(executor)
    .await
}

pub async fn find_in_deck_by_meaning<'e, E>(
    executor: E,
    deck_id: Uuid,
    meaning: &str,
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
            WHERE fd.deck_id = $1 AND f.meaning = $2
            ORDER BY f.created_at
        "#,
    )
    .bind(deck_id)
    .bind(meaning)
    .fetch_all(executor)
    .await
}

/// Partial update: a NULL parameter leaves the corresponding column untouched.
pub async fn update_flashcard<'e, E>(
    executor: E,
    flashcard_id: Uuid,
    word: Option<&str>,
    meaning: Option<&str>,
    usage_examples: Option<&[String]>,
    native_lang: Option<&str>,
    target_lang: Option<&str>,
) -> Result<Option<Flashcard>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            UPDATE flashcards
            SET word = COALESCE($2, word),
                meaning = COALESCE($3, meaning),
                usage_examples = COALESCE($4, usage_examples),
                native_lang = COALESCE($5, native_lang),
                target_lang = COALESCE($6, target_lang)
            WHERE id = $1
            RETURNING id, word, meaning, usage_examples, native_lang, target_lang, created_at
        "#,
    )
    .bind(flashcard_id)
    .bind(word)
    .bind(meaning)
    .bind(usage_examples)
    .bind(native_lang)
    .bind(target_lang)
    .fetch_optional(executor)
    .await
}

pub async fn delete_flashcard<'e, E>(executor: E, flashcard_id: Uuid) -> Result<bool, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    let result = sqlx::query(
        // language=PostgreSQL
        r#"
            DELETE FROM flashcards
            WHERE id = $1
        "#,
    )
    .bind(flashcard_id)
    .execute(executor)
    .await?;

    Ok(result.rows_affected() > 0)
}
