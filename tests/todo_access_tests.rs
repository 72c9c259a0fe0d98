// SPDX-License-Identifier: MIT

//! Todo sharing and cross-space isolation.

use axum::http::StatusCode;
use serde_json::{json, Value};

mod common;
use common::{create_space, create_test_app, join_space, request_json, signup};

async fn create_todo(
    app: &axum::Router,
    token: &str,
    text: &str,
    shared: bool,
) -> (StatusCode, Value) {
    request_json(
        app,
        "POST",
        "/todos",
        Some(token),
        Some(json!({ "text": text, "isShared": shared })),
    )
    .await
}

#[tokio::test]
async fn test_private_todos_are_isolated_across_spaces() {
    let (app, _) = create_test_app();
    let (alice, alice_token) = signup(&app, "Alice", "alice@example.com", "1234").await;
    let (bob, bob_token) = signup(&app, "Bob", "bob@example.com", "5678").await;
    create_space(&app, &alice, &alice_token, "S1").await;
    create_space(&app, &bob, &bob_token, "S2").await;

    create_todo(&app, &alice_token, "alice private", false).await;
    let (_, b_body) = create_todo(&app, &bob_token, "bob private", false).await;
    let bob_todo_id = b_body["data"]["todo_id"].as_str().unwrap().to_string();

    // Alice's list contains only her own item
    let (_, listing) = request_json(&app, "GET", "/todos", Some(&alice_token), None).await;
    let todos = listing["data"].as_array().unwrap();
    assert_eq!(todos.len(), 1);
    assert_eq!(todos[0]["text"], "alice private");

    // Direct access to Bob's todo by id is Forbidden, not NotFound or empty
    let (status, body) = request_json(
        &app,
        "GET",
        &format!("/todos/{}", bob_todo_id),
        Some(&alice_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_shared_todo_visible_to_later_joiner_only() {
    let (app, _) = create_test_app();
    let (alice, alice_token) = signup(&app, "Alice", "alice@example.com", "1234").await;
    let (carol, carol_token) = signup(&app, "Carol", "carol@example.com", "0000").await;
    let (dave, dave_token) = signup(&app, "Dave", "dave@example.com", "1111").await;

    let code = create_space(&app, &alice, &alice_token, "S1").await;
    create_space(&app, &dave, &dave_token, "S2").await;

    let (_, shared) = create_todo(&app, &alice_token, "plan trip", true).await;
    let shared_id = shared["data"]["todo_id"].as_str().unwrap().to_string();

    // Before joining, Carol cannot see it
    let (status, _) = request_json(
        &app,
        "GET",
        &format!("/todos/{}", shared_id),
        Some(&carol_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // After joining Alice's space via the code, she can
    join_space(&app, &carol, &carol_token, &code).await;
    let (status, body) = request_json(
        &app,
        "GET",
        &format!("/todos/{}", shared_id),
        Some(&carol_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["text"], "plan trip");

    // And it shows in her list
    let (_, listing) = request_json(&app, "GET", "/todos", Some(&carol_token), None).await;
    assert!(listing["data"]
        .as_array()
        .unwrap()
        .iter()
        .any(|t| t["todo_id"] == shared_id.as_str()));

    // Dave, in an unrelated space, stays locked out
    let (status, _) = request_json(
        &app,
        "GET",
        &format!("/todos/{}", shared_id),
        Some(&dave_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_space_member_can_update_shared_but_not_resharing() {
    let (app, _) = create_test_app();
    let (alice, alice_token) = signup(&app, "Alice", "alice@example.com", "1234").await;
    let (bob, bob_token) = signup(&app, "Bob", "bob@example.com", "5678").await;
    let code = create_space(&app, &alice, &alice_token, "S1").await;
    join_space(&app, &bob, &bob_token, &code).await;

    let (_, shared) = create_todo(&app, &alice_token, "buy milk", true).await;
    let todo_id = shared["data"]["todo_id"].as_str().unwrap().to_string();

    // Bob checks the item off
    let (status, body) = request_json(
        &app,
        "PUT",
        &format!("/todos/{}", todo_id),
        Some(&bob_token),
        Some(json!({ "done": true })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["done"], true);

    // But only the owner may change the sharing flag
    let (status, _) = request_json(
        &app,
        "PUT",
        &format!("/todos/{}", todo_id),
        Some(&bob_token),
        Some(json!({ "isShared": false })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_shared_todo_requires_space() {
    let (app, _) = create_test_app();
    let (_user, token) = signup(&app, "Solo", "solo@example.com", "1234").await;

    let (status, _) = create_todo(&app, &token, "cannot share", true).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Personal todos are fine without a space
    let (status, _) = create_todo(&app, &token, "personal", false).await;
    assert_eq!(status, StatusCode::OK);
}
