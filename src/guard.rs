// SPDX-License-Identifier: MIT

//! Access guard: per-resource authorization rules.
//!
//! Every resource handler calls into this module before touching the store.
//! The functions are pure so the rules can be tested without a network layer,
//! and they are re-evaluated on every request: space membership can change
//! between polls, so decisions are never cached.

use crate::error::AppError;
use crate::models::{Event, Message, Nudge, Todo};

/// Identity of the acting user, as established by the session middleware.
#[derive(Debug, Clone)]
pub struct Caller {
    pub user_id: String,
    pub space_id: Option<String>,
}

impl Caller {
    pub fn new(user_id: impl Into<String>, space_id: Option<String>) -> Self {
        Self {
            user_id: user_id.into(),
            space_id,
        }
    }
}

/// Convert a rule decision into a handler result.
///
/// Denials always surface as `Forbidden`, never as an empty result, so callers
/// can distinguish "nothing shared with you" from a blocked access.
pub fn require(allowed: bool) -> Result<(), AppError> {
    if allowed {
        Ok(())
    } else {
        Err(AppError::Forbidden)
    }
}

/// Todos: owner always; otherwise shared items within the caller's space.
pub fn can_access_todo(caller: &Caller, todo: &Todo) -> bool {
    if todo.user_id == caller.user_id {
        return true;
    }
    match (&caller.space_id, &todo.space_id) {
        (Some(caller_space), Some(todo_space)) => todo.is_shared && caller_space == todo_space,
        _ => false,
    }
}

/// Events are always private to their owner.
pub fn can_access_event(caller: &Caller, event: &Event) -> bool {
    event.user_id == caller.user_id
}

/// Messages: readable by sender and recipient.
pub fn can_read_message(caller: &Caller, message: &Message) -> bool {
    message.sender_id == caller.user_id || message.recipient_id == caller.user_id
}

/// Messages: only the sender may edit or delete.
pub fn can_write_message(caller: &Caller, message: &Message) -> bool {
    message.sender_id == caller.user_id
}

/// Nudges: readable by sender and recipient.
pub fn can_read_nudge(caller: &Caller, nudge: &Nudge) -> bool {
    nudge.sender_id == caller.user_id || nudge.recipient_id == caller.user_id
}

/// Nudges: only the recipient acknowledges a nudge.
pub fn can_mark_nudge_seen(caller: &Caller, nudge: &Nudge) -> bool {
    nudge.recipient_id == caller.user_id
}
