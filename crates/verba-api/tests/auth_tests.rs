//! Signup, signin, token refresh, and logout.
//!
//! Validation and token rejection run without a database. The full
//! credential lifecycle needs Postgres and is marked `#[ignore]`.

use axum::http::StatusCode;
use serde_json::json;
use uuid::Uuid;

use crate::common::{TestConfig, jwt, test_client, test_client_with_db, test_data};

#[tokio::test]
async fn test_signup_rejects_short_login() {
    let client = test_client();

    let response = client
        .post_json(
            "/auth/signup",
            &json!({"login": "abc", "password": test_data::TEST_PASSWORD}),
        )
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body = response.json_value();
    assert_eq!(body["error"], "Login must be between 4 and 64 characters long");
}

#[tokio::test]
async fn test_signup_rejects_uppercase_login() {
    let client = test_client();

    let response = client
        .post_json(
            "/auth/signup",
            &json!({"login": "Visitor", "password": test_data::TEST_PASSWORD}),
        )
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body = response.json_value();
    assert_eq!(body["error"], "Login must start with a lowercase letter");
}

#[tokio::test]
async fn test_signup_rejects_weak_password() {
    let client = test_client();

    let response = client
        .post_json(
            "/auth/signup",
            &json!({"login": "visitor", "password": "short1"}),
        )
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let response = client
        .post_json(
            "/auth/signup",
            &json!({"login": "visitor", "password": "no-digits-here"}),
        )
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body = response.json_value();
    assert_eq!(
        body["error"],
        "Password must contain at least one letter and one number"
    );
}

#[tokio::test]
async fn test_signup_rejects_missing_fields() {
    let client = test_client();

    let response = client.post_json("/auth/signup", &json!({})).await;
    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_protected_route_requires_token() {
    let client = test_client();

    let response = client.get("/user").await;
    response.assert_status(StatusCode::UNAUTHORIZED);

    let body = response.json_value();
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_protected_route_rejects_garbage_token() {
    let client = test_client();

    let response = client.get_with_auth("/user", "not-a-jwt").await;
    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_protected_route_rejects_expired_token() {
    let config = TestConfig::default();
    let client = test_client();

    let token = jwt::create_expired_token(Uuid::new_v4(), "visitor", &config.jwt_secret);
    let response = client.get_with_auth("/user", &token).await;
    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_protected_route_rejects_token_signed_with_other_secret() {
    let client = test_client();

    let token = jwt::create_test_token(
        Uuid::new_v4(),
        "visitor",
        "some-other-secret-0123456789abcdefghij",
    );
    let response = client.get_with_auth("/user", &token).await;
    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_signin_degrades_cleanly_when_database_is_down() {
    let client = test_client();

    let response = client
        .post_json(
            "/auth/signin",
            &json!({"login": "visitor", "password": test_data::TEST_PASSWORD}),
        )
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let body = response.json_value();
    assert_eq!(body["error"], "internal server error");
}

#[tokio::test]
async fn test_signup_rate_limit_kicks_in() {
    let client = test_client();

    // Burst capacity is 10; the eleventh rapid request from one IP is turned
    // away before the handler runs.
    for _ in 0..10 {
        let response = client.post_json("/auth/signup", &json!({})).await;
        assert_ne!(response.status, StatusCode::TOO_MANY_REQUESTS);
    }

    let response = client.post_json("/auth/signup", &json!({})).await;
    response.assert_status(StatusCode::TOO_MANY_REQUESTS);
}

#[tokio::test]
#[ignore = "needs a running Postgres at TEST_DATABASE_URL"]
async fn test_credential_lifecycle() {
    let (client, _pool) = test_client_with_db().await.expect("test database");
    let login = test_data::unique_login("auth");

    // Signup issues the first token pair.
    let response = client
        .post_json(
            "/auth/signup",
            &json!({"login": login, "password": test_data::TEST_PASSWORD}),
        )
        .await;
    response.assert_status(StatusCode::CREATED);

    let tokens = response.json_value();
    assert!(Uuid::parse_str(tokens["id"].as_str().expect("id")).is_ok());
    assert!(tokens["token"].is_string());
    assert!(tokens["refresh_token"].is_string());
    let expires_in = tokens["expired_at"].as_i64().expect("expired_at") - chrono::Utc::now().timestamp();
    assert!((86300..=86500).contains(&expires_in), "unexpected expiry window: {expires_in}");

    // The login is now taken.
    let response = client
        .post_json(
            "/auth/signup",
            &json!({"login": login, "password": test_data::TEST_PASSWORD}),
        )
        .await;
    response.assert_status(StatusCode::CONFLICT);

    // Wrong password and unknown login read the same.
    let response = client
        .post_json(
            "/auth/signin",
            &json!({"login": login, "password": "wrong-password-9"}),
        )
        .await;
    response.assert_status(StatusCode::UNAUTHORIZED);
    assert_eq!(response.json_value()["error"], "Invalid login or password");

    let response = client
        .post_json(
            "/auth/signin",
            &json!({"login": test_data::unique_login("ghost"), "password": test_data::TEST_PASSWORD}),
        )
        .await;
    response.assert_status(StatusCode::UNAUTHORIZED);
    assert_eq!(response.json_value()["error"], "Invalid login or password");

    // Correct credentials sign in.
    let response = client
        .post_json(
            "/auth/signin",
            &json!({"login": login, "password": test_data::TEST_PASSWORD}),
        )
        .await;
    response.assert_status(StatusCode::OK);
    let tokens = response.json_value();
    let access_token = tokens["token"].as_str().expect("token").to_string();
    let refresh_token = tokens["refresh_token"].as_str().expect("refresh_token").to_string();

    // The access token opens protected routes.
    let response = client.get_with_auth("/user", &access_token).await;
    response.assert_status(StatusCode::OK);
    assert_eq!(response.json_value()["login"], login.as_str());

    // Refresh rotates: the new pair works, the spent token does not.
    let response = client
        .post_json("/auth/refresh", &json!({"refresh_token": refresh_token}))
        .await;
    response.assert_status(StatusCode::OK);
    let rotated = response.json_value();
    let rotated_refresh = rotated["refresh_token"].as_str().expect("refresh_token").to_string();
    assert_ne!(rotated_refresh, refresh_token);

    let response = client
        .post_json("/auth/refresh", &json!({"refresh_token": refresh_token}))
        .await;
    response.assert_status(StatusCode::UNAUTHORIZED);

    // Logout revokes every refresh token the account holds.
    let response = client.post_with_auth("/auth/logout", &access_token).await;
    response.assert_status(StatusCode::OK);
    assert_eq!(response.json_value()["message"], "Logged out successfully");

    let response = client
        .post_json("/auth/refresh", &json!({"refresh_token": rotated_refresh}))
        .await;
    response.assert_status(StatusCode::UNAUTHORIZED);
}
