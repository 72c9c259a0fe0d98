// SPDX-License-Identifier: MIT

//! To-do routes: personal items plus space-shared lists.

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
use crate::models::Todo;
use crate::routes::{load_caller, ok, Envelope};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/todos", get(list_todos).post(create_todo))
        .route(
            "/todos/{todo_id}",
            get(get_todo).put(update_todo).delete(delete_todo),
        )
}

#[derive(Deserialize)]
pub struct CreateTodoRequest {
    pub text: String,
    #[serde(rename = "isShared", default)]
    pub is_shared: bool,
}

#[derive(Deserialize)]
pub struct UpdateTodoRequest {
    pub text: Option<String>,
    pub done: Option<bool>,
    #[serde(rename = "isShared")]
    pub is_shared: Option<bool>,
}

/// List todos visible to the caller: own items plus shared items in their
/// space. Scoping matches the guard, so the list never contains an item a
/// by-id request would deny.
async fn list_todos(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<Envelope<Vec<Todo>>>> {
    let caller = load_caller(&state, &auth).await?;
    let todos = state
        .db
        .list_todos_visible(&caller.user_id, caller.space_id.as_deref())
        .await?;
    Ok(ok(todos))
}

async fn create_todo(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Json(payload): Json<CreateTodoRequest>,
) -> Result<Json<Envelope<Todo>>> {
    let caller = load_caller(&state, &auth).await?;

    if payload.text.trim().is_empty() {
        return Err(AppError::BadRequest("todo text must not be empty".to_string()));
    }
    if payload.is_shared && caller.space_id.is_none() {
        return Err(AppError::BadRequest(
            "join a space before sharing a todo".to_string(),
        ));
    }

    let now = chrono::Utc::now().to_rfc3339();
    let todo = Todo {
        todo_id: uuid::Uuid::new_v4().to_string(),
        user_id: caller.user_id.clone(),
        // Recorded at creation so the rule holds even if the owner later
        // changes spaces.
        space_id: if payload.is_shared {
            caller.space_id.clone()
        } else {
            None
        },
        is_shared: payload.is_shared,
        text: payload.text,
        done: false,
        created_at: now.clone(),
        updated_at: now,
    };

    state.db.set_todo(&todo).await?;
    Ok(ok(todo))
}

async fn get_todo(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(todo_id): Path<String>,
) -> Result<Json<Envelope<Todo>>> {
    let caller = load_caller(&state, &auth).await?;
    let todo = state
        .db
        .get_todo(&todo_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("todo {} not found", todo_id)))?;

    guard::require(guard::can_access_todo(&caller, &todo))?;
    Ok(ok(todo))
}

/// Update text/done; shared-space members may edit, but only the owner may
/// change the sharing flag.
async fn update_todo(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(todo_id): Path<String>,
    Json(payload): Json<UpdateTodoRequest>,
) -> Result<Json<Envelope<Todo>>> {
    let caller = load_caller(&state, &auth).await?;
    let mut todo = state
        .db
        .get_todo(&todo_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("todo {} not found", todo_id)))?;

    guard::require(guard::can_access_todo(&caller, &todo))?;

    if let Some(is_shared) = payload.is_shared {
        guard::require(todo.user_id == caller.user_id)?;
        if is_shared && caller.space_id.is_none() {
            return Err(AppError::BadRequest(
                "join a space before sharing a todo".to_string(),
            ));
        }
        todo.is_shared = is_shared;
        todo.space_id = if is_shared { caller.space_id.clone() } else { None };
    }
    if let Some(text) = payload.text {
        todo.text = text;
    }
    if let Some(done) = payload.done {
        todo.done = done;
    }
    todo.updated_at = chrono::Utc::now().to_rfc3339();

    state.db.set_todo(&todo).await?;
    Ok(ok(todo))
}

async fn delete_todo(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(todo_id): Path<String>,
) -> Result<Json<Envelope<()>>> {
    let caller = load_caller(&state, &auth).await?;
    let todo = state
        .db
        .get_todo(&todo_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("todo {} not found", todo_id)))?;

    guard::require(guard::can_access_todo(&caller, &todo))?;

    state.db.delete_todo(&todo_id).await?;
    Ok(ok(()))
}
