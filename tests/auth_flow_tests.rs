// SPDX-License-Identifier: MIT

//! Signup and login flow tests.
//!
//! These verify the credential-store behavior over the full HTTP surface:
//! email uniqueness, PIN format checks, the login name-overwrite side effect,
//! and the non-enumerating login failure message.

use axum::http::StatusCode;
use serde_json::json;

mod common;
use common::{create_test_app, request_json, signup};

#[tokio::test]
async fn test_signup_returns_user_and_token() {
    let (app, _) = create_test_app();
    let (user, token) = signup(&app, "Alice", "alice@example.com", "1234").await;

    assert_eq!(user["email"], "alice@example.com");
    assert_eq!(user["name"], "Alice");
    assert!(user["space_id"].is_null());
    assert!(user["space_code"].is_null());
    assert!(!token.is_empty());

    // The PIN never appears in API responses
    assert!(user.get("pin").is_none());
}

#[tokio::test]
async fn test_signup_duplicate_email_conflict() {
    let (app, _) = create_test_app();
    signup(&app, "Alice", "alice@example.com", "1234").await;

    let (status, body) = request_json(
        &app,
        "POST",
        "/users/signup",
        None,
        Some(json!({
            "name": "Imposter",
            "email": "alice@example.com",
            "phone": "555-0199",
            "pin": "9999",
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_signup_rejects_malformed_pin() {
    let (app, _) = create_test_app();

    for pin in ["123", "12345", "12a4", ""] {
        let (status, body) = request_json(
            &app,
            "POST",
            "/users/signup",
            None,
            Some(json!({
                "name": "Alice",
                "email": "alice@example.com",
                "phone": "555-0100",
                "pin": pin,
            })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "pin {:?} accepted", pin);
        assert_eq!(body["success"], false);
    }

    // None of the failed attempts created an account
    signup(&app, "Alice", "alice@example.com", "1234").await;
}

#[tokio::test]
async fn test_login_success() {
    let (app, _) = create_test_app();
    signup(&app, "Alice", "alice@example.com", "1234").await;

    let (status, body) = request_json(
        &app,
        "POST",
        "/users/login",
        None,
        Some(json!({ "email": "alice@example.com", "pin": "1234" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["user"]["name"], "Alice");
    assert!(body["data"]["token"].as_str().is_some());
}

#[tokio::test]
async fn test_login_failures_do_not_reveal_account_existence() {
    let (app, _) = create_test_app();
    signup(&app, "Alice", "alice@example.com", "1234").await;

    let (unknown_status, unknown_body) = request_json(
        &app,
        "POST",
        "/users/login",
        None,
        Some(json!({ "email": "nobody@example.com", "pin": "1234" })),
    )
    .await;
    let (wrong_status, wrong_body) = request_json(
        &app,
        "POST",
        "/users/login",
        None,
        Some(json!({ "email": "alice@example.com", "pin": "4321" })),
    )
    .await;

    // Same status, same message for both failure modes
    assert_eq!(unknown_status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_body["error"], wrong_body["error"]);
}

#[tokio::test]
async fn test_login_overwrites_display_name() {
    let (app, _) = create_test_app();
    signup(&app, "Alice", "alice@example.com", "1234").await;

    let (status, body) = request_json(
        &app,
        "POST",
        "/users/login",
        None,
        Some(json!({ "email": "alice@example.com", "pin": "1234", "name": "Ali" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["user"]["name"], "Ali");

    // The overwrite persisted
    let (_, second) = request_json(
        &app,
        "POST",
        "/users/login",
        None,
        Some(json!({ "email": "alice@example.com", "pin": "1234" })),
    )
    .await;
    assert_eq!(second["data"]["user"]["name"], "Ali");
}

#[tokio::test]
async fn test_protected_route_without_token() {
    let (app, _) = create_test_app();

    let (status, _) = request_json(&app, "GET", "/todos", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_protected_route_with_invalid_token() {
    let (app, _) = create_test_app();

    let (status, _) =
        request_json(&app, "GET", "/todos", Some("invalid.token.here"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_health_no_auth_required() {
    let (app, _) = create_test_app();

    let (status, body) = request_json(&app, "GET", "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}
