// SPDX-License-Identifier: MIT

//! Message routes.
//!
//! Readable by sender and recipient; only the sender may delete. Recipients
//! must be members of the caller's space.

use axum::{
    extract::{Path, State},
    routing::get,
    Extension, Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::guard;
use crate::middleware::auth::AuthUser;
use crate::models::Message;
use crate::routes::{load_caller, ok, Envelope};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/messages", get(list_messages).post(create_message))
        .route("/messages/{message_id}", get(get_message).delete(delete_message))
}

#[derive(Deserialize)]
pub struct CreateMessageRequest {
    #[serde(rename = "recipientId")]
    pub recipient_id: String,
    pub body: String,
}

/// Check that the recipient shares the caller's space.
async fn require_partner(state: &AppState, caller: &guard::Caller, recipient_id: &str) -> Result<()> {
    let recipient = state
        .db
        .get_user(recipient_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("user {} not found", recipient_id)))?;

    let same_space = match (&caller.space_id, &recipient.space_id) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    };
    guard::require(same_space && recipient.user_id != caller.user_id)
}

/// List messages where the caller is sender or recipient, newest first.
///
/// Polled by the client; access is re-evaluated on every call.
async fn list_messages(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<Envelope<Vec<Message>>>> {
    let messages = state.db.list_messages_for_user(&auth.user_id).await?;
    Ok(ok(messages))
}

async fn create_message(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Json(payload): Json<CreateMessageRequest>,
) -> Result<Json<Envelope<Message>>> {
    let caller = load_caller(&state, &auth).await?;

    if payload.body.trim().is_empty() {
        return Err(AppError::BadRequest("message body must not be empty".to_string()));
    }
    require_partner(&state, &caller, &payload.recipient_id).await?;

    let message = Message {
        message_id: uuid::Uuid::new_v4().to_string(),
        sender_id: caller.user_id.clone(),
        recipient_id: payload.recipient_id,
        body: payload.body,
        created_at: chrono::Utc::now().to_rfc3339(),
    };

    state.db.set_message(&message).await?;
    Ok(ok(message))
}

async fn get_message(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(message_id): Path<String>,
) -> Result<Json<Envelope<Message>>> {
    let caller = load_caller(&state, &auth).await?;
    let message = state
        .db
        .get_message(&message_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("message {} not found", message_id)))?;

    guard::require(guard::can_read_message(&caller, &message))?;
    Ok(ok(message))
}

async fn delete_message(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(message_id): Path<String>,
) -> Result<Json<Envelope<()>>> {
    let caller = load_caller(&state, &auth).await?;
    let message = state
        .db
        .get_message(&message_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("message {} not found", message_id)))?;

    guard::require(guard::can_write_message(&caller, &message))?;

    state.db.delete_message(&message_id).await?;
    Ok(ok(()))
}
