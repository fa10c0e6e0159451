//! Flashcard CRUD and deck-scoped term search.

use axum::http::StatusCode;
use serde_json::json;
use uuid::Uuid;

use crate::common::{TestConfig, db, jwt, test_client, test_client_with_db, test_data};

#[tokio::test]
async fn test_flashcard_routes_require_token() {
    let client = test_client();

    let response = client.get("/flashcard").await;
    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_get_flashcards_requires_a_usable_query() {
    let config = TestConfig::default();
    let client = test_client();
    let token = jwt::create_test_token(Uuid::new_v4(), "visitor", &config.jwt_secret);

    let response = client.get_with_auth("/flashcard", &token).await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json_value()["error"],
        "id, or deck_id with word or meaning, is required"
    );

    // A deck id alone is not enough either.
    let uri = format!("/flashcard?deck_id={}", Uuid::new_v4());
    let response = client.get_with_auth(&uri, &token).await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_flashcard_rejects_blank_terms() {
    let config = TestConfig::default();
    let client = test_client();
    let token = jwt::create_test_token(Uuid::new_v4(), "visitor", &config.jwt_secret);

    let response = client
        .post_json_with_auth(
            "/flashcard",
            &json!({"content": {"word_in_native": "cat", "word_in_target": "   "}}),
            &token,
        )
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json_value()["error"], "word_in_target cannot be empty");

    let response = client
        .post_json_with_auth(
            "/flashcard",
            &json!({"content": {"word_in_native": "", "word_in_target": "katze"}}),
            &token,
        )
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json_value()["error"], "word_in_native cannot be empty");
}

#[tokio::test]
async fn test_create_flashcard_rejects_bad_language_code() {
    let config = TestConfig::default();
    let client = test_client();
    let token = jwt::create_test_token(Uuid::new_v4(), "visitor", &config.jwt_secret);

    let response = client
        .post_json_with_auth(
            "/flashcard",
            &json!({
                "native_lang": "x9",
                "content": {"word_in_native": "cat", "word_in_target": "katze"}
            }),
            &token,
        )
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_flashcard_requires_some_field() {
    let config = TestConfig::default();
    let client = test_client();
    let token = jwt::create_test_token(Uuid::new_v4(), "visitor", &config.jwt_secret);

    let response = client
        .put_json_with_auth("/flashcard", &json!({"id": Uuid::new_v4()}), &token)
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json_value()["error"], "No fields to update");
}

#[tokio::test]
async fn test_update_flashcard_rejects_blank_term() {
    let config = TestConfig::default();
    let client = test_client();
    let token = jwt::create_test_token(Uuid::new_v4(), "visitor", &config.jwt_secret);

    let response = client
        .put_json_with_auth(
            "/flashcard",
            &json!({"id": Uuid::new_v4(), "word_in_target": "  "}),
            &token,
        )
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_delete_flashcard_requires_id() {
    let config = TestConfig::default();
    let client = test_client();
    let token = jwt::create_test_token(Uuid::new_v4(), "visitor", &config.jwt_secret);

    let response = client.delete_with_auth("/flashcard", &token).await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json_value()["error"], "id is required");
}

#[tokio::test]
#[ignore = "needs a running Postgres at TEST_DATABASE_URL"]
async fn test_flashcard_crud_and_deck_search() {
    let config = TestConfig::default();
    let (client, pool) = test_client_with_db().await.expect("test database");

    let login = test_data::unique_login("cards");
    let user_id = db::create_test_user(&pool, &login, test_data::TEST_PASSWORD)
        .await
        .expect("test user");
    let token = jwt::create_test_token(user_id, &login, &config.jwt_secret);

    // Create a card. The decomposed accent must come back composed.
    let response = client
        .post_json_with_auth(
            "/flashcard",
            &json!({
                "native_lang": "en",
                "target_lang": "fr",
                "content": {
                    "word_in_native": "coffee",
                    "word_in_target": "cafe\u{301}",
                    "usage": ["Un café, s'il vous plaît.", "   "]
                }
            }),
            &token,
        )
        .await;
    response.assert_status(StatusCode::CREATED);

    let card = &response.json_value()["flashcard"];
    let card_id = card["id"].as_str().expect("id").to_string();
    assert_eq!(card["word_in_target"], "caf\u{e9}");
    assert_eq!(card["word_in_native"], "coffee");
    // Blank usage entries are dropped.
    assert_eq!(card["usage"].as_array().expect("usage").len(), 1);

    // Fetch by id.
    let response = client
        .get_with_auth(&format!("/flashcard?id={card_id}"), &token)
        .await;
    response.assert_status(StatusCode::OK);
    assert_eq!(response.json_value()["flashcards"][0]["id"], card_id.as_str());

    // Put the card in a deck and search for it there, spelled the other way.
    let response = client
        .post_json_with_auth("/deck", &json!({"name": "French"}), &token)
        .await;
    response.assert_status(StatusCode::CREATED);
    let deck_id = response.json_value()["deck"]["id"]
        .as_str()
        .expect("deck id")
        .to_string();

    let response = client
        .post_json_with_auth(
            &format!("/deck/{deck_id}/flashcards"),
            &json!({"flashcard_id": card_id}),
            &token,
        )
        .await;
    response.assert_status(StatusCode::CREATED);

    let response = client
        .get_with_auth(
            &format!("/flashcard?deck_id={deck_id}&word=caf%C3%A9"),
            &token,
        )
        .await;
    response.assert_status(StatusCode::OK);
    assert_eq!(response.json_value()["flashcards"][0]["id"], card_id.as_str());

    let response = client
        .get_with_auth(&format!("/flashcard?deck_id={deck_id}&word=the"), &token)
        .await;
    response.assert_status(StatusCode::NOT_FOUND);

    let response = client
        .get_with_auth(
            &format!("/flashcard?deck_id={deck_id}&meaning=coffee"),
            &token,
        )
        .await;
    response.assert_status(StatusCode::OK);

    // Partial update touches only the named fields.
    let response = client
        .put_json_with_auth(
            "/flashcard",
            &json!({"id": card_id, "word_in_native": "a coffee"}),
            &token,
        )
        .await;
    response.assert_status(StatusCode::OK);
    let updated = &response.json_value()["flashcard"];
    assert_eq!(updated["word_in_native"], "a coffee");
    assert_eq!(updated["word_in_target"], "caf\u{e9}");

    // Updating a card that does not exist is a 404.
    let response = client
        .put_json_with_auth(
            "/flashcard",
            &json!({"id": Uuid::new_v4(), "word_in_native": "x"}),
            &token,
        )
        .await;
    response.assert_status(StatusCode::NOT_FOUND);

    // Delete the card; membership rows go with it.
    let response = client
        .delete_with_auth(&format!("/flashcard?id={card_id}"), &token)
        .await;
    response.assert_status(StatusCode::OK);

    let response = client
        .get_with_auth(&format!("/flashcard?id={card_id}"), &token)
        .await;
    response.assert_status(StatusCode::NOT_FOUND);

    let response = client
        .get_with_auth(&format!("/deck/{deck_id}/flashcards"), &token)
        .await;
    response.assert_status(StatusCode::OK);
    assert_eq!(
        response.json_value()["flashcards"]
            .as_array()
            .expect("flashcards")
            .len(),
        0
    );
}
