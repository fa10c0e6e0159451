use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    routing::{delete, get, post, put},
};
use serde::Deserialize;
use serde_json::json;
use sqlx::types::Uuid;
use verba_db::repositories::flashcard as flashcard_repo;

use super::model::{FlashcardResponse, NewFlashcardRequest, UpdateFlashcardRequest};
use crate::{ApiState, auth::AuthUser, deck::service, error::ApiError, normalization, validation};

/// Create the flashcard routes
pub fn routes() -> Router<ApiState> {
    Router::new()
        .route("/flashcard", get(get_flashcards))
        .route("/flashcard", post(create_flashcard))
        .route("/flashcard", put(update_flashcard))
        .route("/flashcard", delete(delete_flashcard))
}

#[derive(Debug, Deserialize)]
struct FlashcardQuery {
    id: Option<Uuid>,
    deck_id: Option<Uuid>,
    word: Option<String>,
    meaning: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DeleteFlashcardQuery {
    id: Option<Uuid>,
}

/// Look up flashcards by ID, or by term within one of the caller's decks
async fn get_flashcards(
    auth_user: AuthUser,
    State(state): State<ApiState>,
    Query(query): Query<FlashcardQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let flashcards = match query {
        FlashcardQuery { id: Some(id), .. } => {
            let flashcard = flashcard_repo::find_flashcard_by_id(&state.pool, id)
                .await?
                .ok_or(ApiError::NotFound("flashcard"))?;
            vec![flashcard]
        }
        FlashcardQuery {
            deck_id: Some(deck_id),
            word: Some(word),
            ..
        } => {
            service::require_owned_deck(&state.pool, deck_id, auth_user.user_id).await?;
            let term = normalization::normalize_term(&word);
            flashcard_repo::find_in_deck_by_word(&state.pool, deck_id, &term).await?
        }
        FlashcardQuery {
            deck_id: Some(deck_id),
            meaning: Some(meaning),
            ..
        } => {
            service::require_owned_deck(&state.pool, deck_id, auth_user.user_id).await?;
            let term = normalization::normalize_term(&meaning);
            flashcard_repo::find_in_deck_by_meaning(&state.pool, deck_id, &term).await?
        }
        _ => {
            return Err(ApiError::Validation(
                "id, or deck_id with word or meaning, is required".to_string(),
            ));
        }
    };

    if flashcards.is_empty() {
        return Err(ApiError::NotFound("flashcard"));
    }

    let flashcards: Vec<FlashcardResponse> = flashcards.into_iter().map(Into::into).collect();
    Ok(Json(json!({ "flashcards": flashcards })))
}

/// Create a new flashcard
async fn create_flashcard(
    _auth_user: AuthUser,
    State(state): State<ApiState>,
    Json(payload): Json<NewFlashcardRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    let word = normalization::normalize_term(&payload.content.word_in_target);
    let meaning = normalization::normalize_term(&payload.content.word_in_native);

    if word.is_empty() {
        return Err(ApiError::Validation(
            "word_in_target cannot be empty".to_string(),
        ));
    }
    if meaning.is_empty() {
        return Err(ApiError::Validation(
            "word_in_native cannot be empty".to_string(),
        ));
    }
    if let Some(code) = &payload.native_lang {
        validation::validate_language_code(code)?;
    }
    if let Some(code) = &payload.target_lang {
        validation::validate_language_code(code)?;
    }

    let usage = normalize_usage(&payload.content.usage);

    let flashcard = flashcard_repo::create_flashcard(
        &state.pool,
        &word,
        &meaning,
        &usage,
        payload.native_lang.as_deref(),
        payload.target_lang.as_deref(),
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Flashcard created successfully",
            "flashcard": FlashcardResponse::from(flashcard)
        })),
    ))
}

/// Partially update a flashcard; absent fields keep their stored value
async fn update_flashcard(
    _auth_user: AuthUser,
    State(state): State<ApiState>,
    Json(payload): Json<UpdateFlashcardRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    if payload.word_in_target.is_none()
        && payload.word_in_native.is_none()
        && payload.usage.is_none()
        && payload.native_lang.is_none()
        && payload.target_lang.is_none()
    {
        return Err(ApiError::Validation("No fields to update".to_string()));
    }

    let word = payload
        .word_in_target
        .as_deref()
        .map(normalization::normalize_term);
    if word.as_deref() == Some("") {
        return Err(ApiError::Validation(
            "word_in_target cannot be empty".to_string(),
        ));
    }
    let meaning = payload
        .word_in_native
        .as_deref()
        .map(normalization::normalize_term);
    if meaning.as_deref() == Some("") {
        return Err(ApiError::Validation(
            "word_in_native cannot be empty".to_string(),
        ));
    }
    if let Some(code) = &payload.native_lang {
        validation::validate_language_code(code)?;
    }
    if let Some(code) = &payload.target_lang {
        validation::validate_language_code(code)?;
    }

    let usage = payload.usage.as_deref().map(normalize_usage);

    let flashcard = flashcard_repo::update_flashcard(
        &state.pool,
        payload.id,
        word.as_deref(),
        meaning.as_deref(),
        usage.as_deref(),
        payload.native_lang.as_deref(),
        payload.target_lang.as_deref(),
    )
    .await?
    .ok_or(ApiError::NotFound("flashcard"))?;

    Ok(Json(json!({
        "message": "Flashcard updated successfully",
        "flashcard": FlashcardResponse::from(flashcard)
    })))
}

/// Delete a flashcard
async fn delete_flashcard(
    _auth_user: AuthUser,
    State(state): State<ApiState>,
    Query(query): Query<DeleteFlashcardQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let id = query
        .id
        .ok_or_else(|| ApiError::Validation("id is required".to_string()))?;

    let deleted = flashcard_repo::delete_flashcard(&state.pool, id).await?;
    if !deleted {
        return Err(ApiError::NotFound("flashcard"));
    }

    Ok(Json(json!({
        "message": "Flashcard deleted successfully",
        "id": id
    })))
}

/// Normalize example sentences and drop the ones that come out empty.
fn normalize_usage(entries: &[String]) -> Vec<String> {
    entries
        .iter()
        .map(|entry| normalization::normalize_term(entry))
        .filter(|entry| !entry.is_empty())
        .collect()
}
