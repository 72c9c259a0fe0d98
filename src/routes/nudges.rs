// SPDX-License-Identifier: MIT

//! Nudge routes.
//!
//! Nudges are fire-and-forget pokes; delivery to devices is handled by an
//! external push service. The inbox here is the at-least-once source of
//! truth the client polls, and only the recipient may acknowledge.

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Extension, Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::guard;
use crate::middleware::auth::AuthUser;
use crate::models::Nudge;
use crate::routes::{load_caller, ok, Envelope};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/nudges", get(list_nudges).post(create_nudge))
        .route("/nudges/{nudge_id}", get(get_nudge))
        .route("/nudges/{nudge_id}/seen", post(mark_seen))
}

#[derive(Deserialize)]
pub struct CreateNudgeRequest {
    #[serde(rename = "recipientId")]
    pub recipient_id: String,
    /// Nudge kind, e.g. "miss_you"
    pub kind: String,
}

/// Recipient inbox, newest first. Re-scoped on every poll.
async fn list_nudges(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<Envelope<Vec<Nudge>>>> {
    let nudges = state.db.list_nudges_for_recipient(&auth.user_id).await?;
    Ok(ok(nudges))
}

async fn create_nudge(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Json(payload): Json<CreateNudgeRequest>,
) -> Result<Json<Envelope<Nudge>>> {
    let caller = load_caller(&state, &auth).await?;

    if payload.kind.trim().is_empty() {
        return Err(AppError::BadRequest("nudge kind must not be empty".to_string()));
    }

    let recipient = state
        .db
        .get_user(&payload.recipient_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("user {} not found", payload.recipient_id)))?;

    let same_space = match (&caller.space_id, &recipient.space_id) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    };
    guard::require(same_space && recipient.user_id != caller.user_id)?;

    let nudge = Nudge {
        nudge_id: uuid::Uuid::new_v4().to_string(),
        sender_id: caller.user_id.clone(),
        recipient_id: payload.recipient_id,
        kind: payload.kind,
        seen: false,
        seen_at: None,
        created_at: chrono::Utc::now().to_rfc3339(),
    };

    state.db.set_nudge(&nudge).await?;
    Ok(ok(nudge))
}

async fn get_nudge(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(nudge_id): Path<String>,
) -> Result<Json<Envelope<Nudge>>> {
    let caller = load_caller(&state, &auth).await?;
    let nudge = state
        .db
        .get_nudge(&nudge_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("nudge {} not found", nudge_id)))?;

    guard::require(guard::can_read_nudge(&caller, &nudge))?;
    Ok(ok(nudge))
}

/// Acknowledge a nudge. Idempotent: the first seen_at wins.
async fn mark_seen(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(nudge_id): Path<String>,
) -> Result<Json<Envelope<Nudge>>> {
    let caller = load_caller(&state, &auth).await?;
    let mut nudge = state
        .db
        .get_nudge(&nudge_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("nudge {} not found", nudge_id)))?;

    guard::require(guard::can_mark_nudge_seen(&caller, &nudge))?;

    if !nudge.seen {
        nudge.seen = true;
        nudge.seen_at = Some(chrono::Utc::now().to_rfc3339());
        state.db.set_nudge(&nudge).await?;
    }
    Ok(ok(nudge))
}
