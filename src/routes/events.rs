// SPDX-License-Identifier: MIT

//! Countdown event routes. Events are always private to their owner.

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
use crate::models::Event;
use crate::routes::{load_caller, ok, Envelope};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/events", get(list_events).post(create_event))
        .route(
            "/events/{event_id}",
            get(get_event).put(update_event).delete(delete_event),
        )
}

#[derive(Deserialize)]
pub struct CreateEventRequest {
    pub title: String,
    /// Target date (RFC3339)
    pub date: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateEventRequest {
    pub title: Option<String>,
    pub date: Option<String>,
    pub description: Option<String>,
}

fn parse_date(raw: &str) -> Result<String> {
    chrono::DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.to_rfc3339())
        .map_err(|_| AppError::BadRequest("date must be an RFC3339 datetime".to_string()))
}

async fn list_events(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<Envelope<Vec<Event>>>> {
    let events = state.db.list_events_for_user(&auth.user_id).await?;
    Ok(ok(events))
}

async fn create_event(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Json(payload): Json<CreateEventRequest>,
) -> Result<Json<Envelope<Event>>> {
    if payload.title.trim().is_empty() {
        return Err(AppError::BadRequest("event title must not be empty".to_string()));
    }
    let date = parse_date(&payload.date)?;

    let now = chrono::Utc::now().to_rfc3339();
    let event = Event {
        event_id: uuid::Uuid::new_v4().to_string(),
        user_id: auth.user_id.clone(),
        title: payload.title,
        date,
        description: payload.description,
        created_at: now.clone(),
        updated_at: now,
    };

    state.db.set_event(&event).await?;
    Ok(ok(event))
}

async fn get_event(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(event_id): Path<String>,
) -> Result<Json<Envelope<Event>>> {
    let caller = load_caller(&state, &auth).await?;
    let event = state
        .db
        .get_event(&event_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("event {} not found", event_id)))?;

    guard::require(guard::can_access_event(&caller, &event))?;
    Ok(ok(event))
}

async fn update_event(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(event_id): Path<String>,
    Json(payload): Json<UpdateEventRequest>,
) -> Result<Json<Envelope<Event>>> {
    let caller = load_caller(&state, &auth).await?;
    let mut event = state
        .db
        .get_event(&event_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("event {} not found", event_id)))?;

    guard::require(guard::can_access_event(&caller, &event))?;

    if let Some(title) = payload.title {
        event.title = title;
    }
    if let Some(date) = payload.date {
        event.date = parse_date(&date)?;
    }
    if payload.description.is_some() {
        event.description = payload.description;
    }
    event.updated_at = chrono::Utc::now().to_rfc3339();

    state.db.set_event(&event).await?;
    Ok(ok(event))
}

async fn delete_event(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(event_id): Path<String>,
) -> Result<Json<Envelope<()>>> {
    let caller = load_caller(&state, &auth).await?;
    let event = state
        .db
        .get_event(&event_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("event {} not found", event_id)))?;

    guard::require(guard::can_access_event(&caller, &event))?;

    state.db.delete_event(&event_id).await?;
    Ok(ok(()))
}
