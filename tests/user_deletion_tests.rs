// SPDX-License-Identifier: MIT

//! Account cleanup: deleting a user removes everything tied to the account.

use serde_json::json;

mod common;
use common::{create_space, create_test_app, join_space, request_json, signup};

#[tokio::test]
async fn test_delete_user_data_removes_nudges_on_both_ends() {
    let (app, state) = create_test_app();
    let (alice, alice_token) = signup(&app, "Alice", "alice@example.com", "1234").await;
    let (bob, bob_token) = signup(&app, "Bob", "bob@example.com", "5678").await;
    let code = create_space(&app, &alice, &alice_token, "Us").await;
    join_space(&app, &bob, &bob_token, &code).await;

    let alice_id = alice["user_id"].as_str().unwrap();
    let bob_id = bob["user_id"].as_str().unwrap();

    // Alice sends Bob a nudge, Bob sends one back
    request_json(
        &app,
        "POST",
        "/nudges",
        Some(&alice_token),
        Some(json!({ "recipientId": bob_id, "kind": "miss_you" })),
    )
    .await;
    request_json(
        &app,
        "POST",
        "/nudges",
        Some(&bob_token),
        Some(json!({ "recipientId": alice_id, "kind": "miss_you" })),
    )
    .await;

    let alice_record = state.db.get_user(alice_id).await.unwrap().unwrap();
    state.db.delete_user_data(&alice_record).await.unwrap();

    // No nudge from the deleted sender lingers in Bob's inbox
    assert!(state
        .db
        .list_nudges_for_recipient(bob_id)
        .await
        .unwrap()
        .is_empty());

    // And nothing is left addressed to the deleted account
    assert!(state
        .db
        .list_nudges_for_recipient(alice_id)
        .await
        .unwrap()
        .is_empty());
    assert!(state
        .db
        .list_nudges_from_sender(alice_id)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_delete_user_data_removes_owned_resources_and_frees_email() {
    let (app, state) = create_test_app();
    let (alice, token) = signup(&app, "Alice", "alice@example.com", "1234").await;
    let alice_id = alice["user_id"].as_str().unwrap();

    request_json(
        &app,
        "POST",
        "/events",
        Some(&token),
        Some(json!({ "title": "anniversary", "date": "2026-06-01T00:00:00Z" })),
    )
    .await;
    request_json(
        &app,
        "POST",
        "/todos",
        Some(&token),
        Some(json!({ "text": "buy flowers" })),
    )
    .await;

    let alice_record = state.db.get_user(alice_id).await.unwrap().unwrap();
    let deleted = state.db.delete_user_data(&alice_record).await.unwrap();
    // event + todo + the user record
    assert_eq!(deleted, 3);

    assert!(state.db.get_user(alice_id).await.unwrap().is_none());
    assert!(state
        .db
        .list_events_for_user(alice_id)
        .await
        .unwrap()
        .is_empty());

    // The email claim is released along with the account
    signup(&app, "Alice Again", "alice@example.com", "4321").await;
}
