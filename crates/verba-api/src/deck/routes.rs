use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post, put},
};
use serde::Deserialize;
use serde_json::json;
use sqlx::types::Uuid;
use verba_db::repositories::deck as deck_repo;

use super::model::DeckResponse;
use super::service;
use crate::{
    ApiState, auth::AuthUser, error::ApiError, error::is_foreign_key_violation,
    flashcard::model::FlashcardResponse, validation,
};

/// Create the deck routes
pub fn routes() -> Router<ApiState> {
    Router::new()
        .route("/deck", get(get_decks))
        .route("/deck", post(create_deck))
        .route("/deck", put(rename_deck))
        .route("/deck", delete(delete_deck))
        .route("/deck/{id}/flashcards", get(list_deck_flashcards))
        .route("/deck/{id}/flashcards", post(add_flashcard_to_deck))
        .route(
            "/deck/{id}/flashcards/{flashcard_id}",
            delete(remove_flashcard_from_deck),
        )
}

#[derive(Debug, Deserialize)]
struct DeckQuery {
    id: Option<Uuid>,
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NewDeckRequest {
    name: String,
}

#[derive(Debug, Deserialize)]
struct RenameDeckRequest {
    id: Uuid,
    name: String,
}

#[derive(Debug, Deserialize)]
struct DeleteDeckQuery {
    id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
struct AddFlashcardRequest {
    flashcard_id: Uuid,
}

/// List the caller's decks, or look one up by ID or name
async fn get_decks(
    auth_user: AuthUser,
    State(state): State<ApiState>,
    Query(query): Query<DeckQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let decks = match query {
        DeckQuery { id: Some(id), .. } => {
            let deck = service::require_owned_deck(&state.pool, id, auth_user.user_id).await?;
            vec![deck]
        }
        DeckQuery {
            name: Some(name), ..
        } => {
            let decks =
                deck_repo::find_decks_by_name(&state.pool, auth_user.user_id, name.trim()).await?;
            if decks.is_empty() {
                return Err(ApiError::NotFound("deck"));
            }
            decks
        }
        _ => deck_repo::find_decks_by_owner(&state.pool, auth_user.user_id).await?,
    };

    let decks: Vec<DeckResponse> = decks.into_iter().map(Into::into).collect();
    Ok(Json(json!({ "decks": decks })))
}

/// Create a new deck
async fn create_deck(
    auth_user: AuthUser,
    State(state): State<ApiState>,
    Json(payload): Json<NewDeckRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    validation::validate_deck_name(&payload.name)?;

    let deck =
        deck_repo::create_deck(&state.pool, payload.name.trim(), auth_user.user_id).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Deck created successfully",
            "deck": DeckResponse::from(deck)
        })),
    ))
}

/// Rename a deck
async fn rename_deck(
    auth_user: AuthUser,
    State(state): State<ApiState>,
    Json(payload): Json<RenameDeckRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    validation::validate_deck_name(&payload.name)?;

    let deck = deck_repo::rename_deck(
        &state.pool,
        payload.id,
        auth_user.user_id,
        payload.name.trim(),
    )
    .await?
    .ok_or(ApiError::NotFound("deck"))?;

    Ok(Json(json!({
        "message": "Deck updated successfully",
        "deck": DeckResponse::from(deck)
    })))
}

/// Delete a deck
async fn delete_deck(
    auth_user: AuthUser,
    State(state): State<ApiState>,
    Query(query): Query<DeleteDeckQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let id = query
        .id
        .ok_or_else(|| ApiError::Validation("id is required".to_string()))?;

    let deleted = deck_repo::delete_deck(&state.pool, id, auth_user.user_id).await?;
    if !deleted {
        return Err(ApiError::NotFound("deck"));
    }

    Ok(Json(json!({
        "message": "Deck deleted successfully",
        "id": id
    })))
}

/// List the flashcards in a deck
async fn list_deck_flashcards(
    auth_user: AuthUser,
    State(state): State<ApiState>,
    Path(deck_id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    service::require_owned_deck(&state.pool, deck_id, auth_user.user_id).await?;

    let flashcards = deck_repo::list_deck_flashcards(&state.pool, deck_id).await?;
    let flashcards: Vec<FlashcardResponse> = flashcards.into_iter().map(Into::into).collect();

    Ok(Json(json!({ "flashcards": flashcards })))
}

/// Add a flashcard to a deck. Adding one that is already there is a no-op.
async fn add_flashcard_to_deck(
    auth_user: AuthUser,
    State(state): State<ApiState>,
    Path(deck_id): Path<Uuid>,
    Json(payload): Json<AddFlashcardRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    service::require_owned_deck(&state.pool, deck_id, auth_user.user_id).await?;

    deck_repo::add_to_deck(&state.pool, deck_id, payload.flashcard_id)
        .await
        .map_err(|err| {
            if is_foreign_key_violation(&err) {
                ApiError::NotFound("flashcard")
            } else {
                ApiError::from(err)
            }
        })?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Flashcard added to deck" })),
    ))
}

/// Remove a flashcard from a deck
async fn remove_flashcard_from_deck(
    auth_user: AuthUser,
    State(state): State<ApiState>,
    Path((deck_id, flashcard_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<serde_json::Value>, ApiError> {
    service::require_owned_deck(&state.pool, deck_id, auth_user.user_id).await?;

    let removed = deck_repo::remove_from_deck(&state.pool, deck_id, flashcard_id).await?;
    if !removed {
        return Err(ApiError::NotFound("flashcard"));
    }

    Ok(Json(json!({
        "message": "Flashcard removed from deck",
        "id": flashcard_id
    })))
}
