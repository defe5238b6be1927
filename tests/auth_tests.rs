// tests/auth_tests.rs

mod common;

use axum::http::StatusCode;
use common::spawn_test_app;
use serde_json::json;

#[tokio::test]
async fn unknown_path_is_404() {
    let app = spawn_test_app().await;
    let (status, _) = app
        .call("GET", "/random_path_that_does_not_exist", None, None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn register_login_and_me() {
    let app = spawn_test_app().await;
    let user = app.register("Meera", "8", "D").await;

    let (status, body) = app
        .call(
            "POST",
            "/api/auth/login",
            None,
            Some(json!({ "email": user.email.to_uppercase(), "password": "password123" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let token = body["token"].as_str().unwrap().to_string();
    assert!(body["user"].get("password_hash").is_none());

    let (status, me) = app.call("GET", "/api/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["name"], "Meera");
    assert_eq!(me["class_name"], "8");
    assert_eq!(me["division"], "D");

    let (status, _) = app.call("POST", "/api/auth/logout", Some(&token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn wrong_password_is_rejected() {
    let app = spawn_test_app().await;
    let user = app.register("Meera", "8", "D").await;

    let (status, body) = app
        .call(
            "POST",
            "/api/auth/login",
            None,
            Some(json!({ "email": user.email, "password": "wrong-password" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid email or password");
}

#[tokio::test]
async fn duplicate_email_is_a_conflict() {
    let app = spawn_test_app().await;
    let user = app.register("Meera", "8", "D").await;

    let (status, body) = app
        .call(
            "POST",
            "/api/auth/register",
            None,
            Some(json!({
                "email": user.email,
                "password": "password123",
                "name": "Someone Else",
                "class_name": "8",
                "division": "D",
                "roll_no": "9",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Email already registered.");
}

#[tokio::test]
async fn register_fails_validation() {
    let app = spawn_test_app().await;

    let (status, _) = app
        .call(
            "POST",
            "/api/auth/register",
            None,
            Some(json!({
                "email": "not-an-email",
                "password": "password123",
                "name": "Meera",
                "class_name": "8",
                "division": "D",
                "roll_no": "9",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
