// SPDX-License-Identifier: MIT

//! Database layer.
//!
//! `Db` is the dependency-injected persistence handle: constructed once at
//! startup and passed by reference through `AppState`. It dispatches to either
//! the Firestore backend (production) or the in-process backend (tests, local
//! development). Both provide per-document atomicity and create-if-absent
//! writes for the uniqueness-bearing documents (email index, space registry);
//! neither provides multi-document transactions, which the service layer does
//! not assume.

pub mod firestore;
pub mod memory;

pub use firestore::FirestoreDb;
pub use memory::MemoryDb;

use crate::error::AppError;
use crate::models::{Event, Message, Nudge, Space, Todo, User};

/// Collection names as constants.
pub mod collections {
    pub const USERS: &str = "users";
    /// Email uniqueness index (keyed by email, create-if-absent)
    pub const EMAIL_INDEX: &str = "email_index";
    /// Space registry (keyed by space code, create-if-absent)
    pub const SPACES: &str = "spaces";
    pub const EVENTS: &str = "events";
    pub const MESSAGES: &str = "messages";
    pub const TODOS: &str = "todos";
    pub const NUDGES: &str = "nudges";
}

/// Persistence handle with typed per-collection operations.
#[derive(Clone)]
pub enum Db {
    Firestore(FirestoreDb),
    Memory(MemoryDb),
}

impl Db {
    /// In-process backend for tests and local development.
    pub fn memory() -> Self {
        Db::Memory(MemoryDb::new())
    }

    /// Firestore backend for production.
    pub async fn firestore(project_id: &str) -> Result<Self, AppError> {
        Ok(Db::Firestore(FirestoreDb::new(project_id).await?))
    }

    // ─── User Operations ─────────────────────────────────────────

    /// Create a user, enforcing email uniqueness.
    ///
    /// Fails with `DuplicateEmail` if the email already has an account. The
    /// email claim is a create-if-absent write, not read-then-write.
    pub async fn create_user(&self, user: &User) -> Result<(), AppError> {
        match self {
            Db::Firestore(db) => db.create_user(user).await,
            Db::Memory(db) => db.create_user(user),
        }
    }

    pub async fn get_user(&self, user_id: &str) -> Result<Option<User>, AppError> {
        match self {
            Db::Firestore(db) => db.get_user(user_id).await,
            Db::Memory(db) => db.get_user(user_id),
        }
    }

    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        match self {
            Db::Firestore(db) => db.find_user_by_email(email).await,
            Db::Memory(db) => db.find_user_by_email(email),
        }
    }

    /// Persist a mutated user record (email never changes through this path).
    pub async fn update_user(&self, user: &User) -> Result<(), AppError> {
        match self {
            Db::Firestore(db) => db.update_user(user).await,
            Db::Memory(db) => db.update_user(user),
        }
    }

    /// All users currently holding the given `space_id`.
    pub async fn list_space_members(&self, space_id: &str) -> Result<Vec<User>, AppError> {
        match self {
            Db::Firestore(db) => db.list_space_members(space_id).await,
            Db::Memory(db) => db.list_space_members(space_id),
        }
    }

    /// Delete a user record and its email index entry.
    pub async fn delete_user(&self, user: &User) -> Result<(), AppError> {
        match self {
            Db::Firestore(db) => db.delete_user(user).await,
            Db::Memory(db) => db.delete_user(user),
        }
    }

    // ─── Space Registry Operations ───────────────────────────────

    /// Claim a generated code for a new space.
    ///
    /// Returns `false` if the code is already taken (caller regenerates).
    pub async fn claim_space(&self, space: &Space) -> Result<bool, AppError> {
        match self {
            Db::Firestore(db) => db.claim_space(space).await,
            Db::Memory(db) => db.claim_space(space),
        }
    }

    pub async fn get_space(&self, space_code: &str) -> Result<Option<Space>, AppError> {
        match self {
            Db::Firestore(db) => db.get_space(space_code).await,
            Db::Memory(db) => db.get_space(space_code),
        }
    }

    /// Release a registry entry (operator cleanup of an emptied space).
    pub async fn release_space(&self, space_code: &str) -> Result<(), AppError> {
        match self {
            Db::Firestore(db) => db.release_space(space_code).await,
            Db::Memory(db) => db.release_space(space_code),
        }
    }

    // ─── Event Operations ────────────────────────────────────────

    pub async fn set_event(&self, event: &Event) -> Result<(), AppError> {
        match self {
            Db::Firestore(db) => db.set_event(event).await,
            Db::Memory(db) => db.set_event(event),
        }
    }

    pub async fn get_event(&self, event_id: &str) -> Result<Option<Event>, AppError> {
        match self {
            Db::Firestore(db) => db.get_event(event_id).await,
            Db::Memory(db) => db.get_event(event_id),
        }
    }

    pub async fn list_events_for_user(&self, user_id: &str) -> Result<Vec<Event>, AppError> {
        match self {
            Db::Firestore(db) => db.list_events_for_user(user_id).await,
            Db::Memory(db) => db.list_events_for_user(user_id),
        }
    }

    pub async fn delete_event(&self, event_id: &str) -> Result<(), AppError> {
        match self {
            Db::Firestore(db) => db.delete_event(event_id).await,
            Db::Memory(db) => db.delete_event(event_id),
        }
    }

    // ─── Message Operations ──────────────────────────────────────

    pub async fn set_message(&self, message: &Message) -> Result<(), AppError> {
        match self {
            Db::Firestore(db) => db.set_message(message).await,
            Db::Memory(db) => db.set_message(message),
        }
    }

    pub async fn get_message(&self, message_id: &str) -> Result<Option<Message>, AppError> {
        match self {
            Db::Firestore(db) => db.get_message(message_id).await,
            Db::Memory(db) => db.get_message(message_id),
        }
    }

    /// Messages where the user is sender or recipient, newest first.
    pub async fn list_messages_for_user(&self, user_id: &str) -> Result<Vec<Message>, AppError> {
        match self {
            Db::Firestore(db) => db.list_messages_for_user(user_id).await,
            Db::Memory(db) => db.list_messages_for_user(user_id),
        }
    }

    pub async fn delete_message(&self, message_id: &str) -> Result<(), AppError> {
        match self {
            Db::Firestore(db) => db.delete_message(message_id).await,
            Db::Memory(db) => db.delete_message(message_id),
        }
    }

    // ─── Todo Operations ─────────────────────────────────────────

    pub async fn set_todo(&self, todo: &Todo) -> Result<(), AppError> {
        match self {
            Db::Firestore(db) => db.set_todo(todo).await,
            Db::Memory(db) => db.set_todo(todo),
        }
    }

    pub async fn get_todo(&self, todo_id: &str) -> Result<Option<Todo>, AppError> {
        match self {
            Db::Firestore(db) => db.get_todo(todo_id).await,
            Db::Memory(db) => db.get_todo(todo_id),
        }
    }

    /// Todos the caller may see: own items plus shared items in their space.
    ///
    /// Applies the same scoping as the access guard so a listing never
    /// contains an item the guard would deny by id.
    pub async fn list_todos_visible(
        &self,
        user_id: &str,
        space_id: Option<&str>,
    ) -> Result<Vec<Todo>, AppError> {
        match self {
            Db::Firestore(db) => db.list_todos_visible(user_id, space_id).await,
            Db::Memory(db) => db.list_todos_visible(user_id, space_id),
        }
    }

    pub async fn delete_todo(&self, todo_id: &str) -> Result<(), AppError> {
        match self {
            Db::Firestore(db) => db.delete_todo(todo_id).await,
            Db::Memory(db) => db.delete_todo(todo_id),
        }
    }

    // ─── Nudge Operations ────────────────────────────────────────

    pub async fn set_nudge(&self, nudge: &Nudge) -> Result<(), AppError> {
        match self {
            Db::Firestore(db) => db.set_nudge(nudge).await,
            Db::Memory(db) => db.set_nudge(nudge),
        }
    }

    pub async fn get_nudge(&self, nudge_id: &str) -> Result<Option<Nudge>, AppError> {
        match self {
            Db::Firestore(db) => db.get_nudge(nudge_id).await,
            Db::Memory(db) => db.get_nudge(nudge_id),
        }
    }

    /// Inbox: nudges addressed to the recipient, newest first.
    pub async fn list_nudges_for_recipient(
        &self,
        recipient_id: &str,
    ) -> Result<Vec<Nudge>, AppError> {
        match self {
            Db::Firestore(db) => db.list_nudges_for_recipient(recipient_id).await,
            Db::Memory(db) => db.list_nudges_for_recipient(recipient_id),
        }
    }

    /// Nudges originated by the given sender (cleanup path).
    pub async fn list_nudges_from_sender(&self, sender_id: &str) -> Result<Vec<Nudge>, AppError> {
        match self {
            Db::Firestore(db) => db.list_nudges_from_sender(sender_id).await,
            Db::Memory(db) => db.list_nudges_from_sender(sender_id),
        }
    }

    pub async fn delete_nudge(&self, nudge_id: &str) -> Result<(), AppError> {
        match self {
            Db::Firestore(db) => db.delete_nudge(nudge_id).await,
            Db::Memory(db) => db.delete_nudge(nudge_id),
        }
    }

    // ─── User Data Deletion (operator cleanup) ───────────────────

    /// Delete a user account and every resource it owns, through the same
    /// typed accessors the service uses.
    ///
    /// Removes owned events and todos, sent messages, and nudges on both ends
    /// (sent ones would dangle in recipients' inboxes, received ones would
    /// never be acknowledgeable), then the user record itself. The space
    /// registry entry is NOT released here; the cleanup tool decides that
    /// based on remaining membership.
    ///
    /// Returns the number of documents deleted.
    pub async fn delete_user_data(&self, user: &User) -> Result<usize, AppError> {
        let mut deleted_count = 0;

        let events = self.list_events_for_user(&user.user_id).await?;
        for event in &events {
            self.delete_event(&event.event_id).await?;
        }
        deleted_count += events.len();
        tracing::debug!(user_id = %user.user_id, count = events.len(), "Deleted events");

        let todos = self.list_todos_visible(&user.user_id, None).await?;
        for todo in todos.iter().filter(|t| t.user_id == user.user_id) {
            self.delete_todo(&todo.todo_id).await?;
            deleted_count += 1;
        }

        let messages = self.list_messages_for_user(&user.user_id).await?;
        for message in messages.iter().filter(|m| m.sender_id == user.user_id) {
            self.delete_message(&message.message_id).await?;
            deleted_count += 1;
        }

        let sent_nudges = self.list_nudges_from_sender(&user.user_id).await?;
        let received_nudges = self.list_nudges_for_recipient(&user.user_id).await?;
        for nudge in sent_nudges.iter().chain(received_nudges.iter()) {
            self.delete_nudge(&nudge.nudge_id).await?;
            deleted_count += 1;
        }

        self.delete_user(user).await?;
        deleted_count += 1;

        tracing::info!(user_id = %user.user_id, deleted_count, "User data deletion complete");

        Ok(deleted_count)
    }
}
