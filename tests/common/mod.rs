// SPDX-License-Identifier: MIT

//! Shared helpers for integration tests.
//!
//! All suites run the full router against the in-process store backend.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use heartlink::config::Config;
use heartlink::db::Db;
use heartlink::routes::create_router;
use heartlink::AppState;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

/// Create a test app over a fresh in-process store.
#[allow(dead_code)]
pub fn create_test_app() -> (Router, Arc<AppState>) {
    let config = Config::test_default();
    let state = Arc::new(AppState::new(config, Db::memory()));
    (create_router(state.clone()), state)
}

/// Issue a JSON request, returning status and parsed envelope body.
#[allow(dead_code)]
pub async fn request_json(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }

    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

/// Sign up a user through the API, returning the user object and token.
#[allow(dead_code)]
pub async fn signup(app: &Router, name: &str, email: &str, pin: &str) -> (Value, String) {
    let (status, body) = request_json(
        app,
        "POST",
        "/users/signup",
        None,
        Some(json!({
            "name": name,
            "email": email,
            "phone": "555-0100",
            "pin": pin,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "signup failed: {}", body);
    assert_eq!(body["success"], true);

    let token = body["data"]["token"].as_str().unwrap().to_string();
    (body["data"]["user"].clone(), token)
}

/// Create a space for the given user, returning the shareable code.
#[allow(dead_code)]
pub async fn create_space(app: &Router, user: &Value, token: &str, name: &str) -> String {
    let user_id = user["user_id"].as_str().unwrap();
    let (status, body) = request_json(
        app,
        "POST",
        &format!("/users/{}/create-space", user_id),
        Some(token),
        Some(json!({ "spaceName": name })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "create-space failed: {}", body);
    body["data"]["space_code"].as_str().unwrap().to_string()
}

/// Join an existing space by code.
#[allow(dead_code)]
pub async fn join_space(app: &Router, user: &Value, token: &str, code: &str) -> Value {
    let user_id = user["user_id"].as_str().unwrap();
    let (status, body) = request_json(
        app,
        "POST",
        &format!("/users/{}/join-space", user_id),
        Some(token),
        Some(json!({ "spaceCode": code })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "join-space failed: {}", body);
    body["data"].clone()
}
