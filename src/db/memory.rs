// SPDX-License-Identifier: MIT

//! In-process store backend.
//!
//! Backs tests and local development with the same operation surface as the
//! Firestore backend. Uniqueness-bearing writes (email claim, space-code
//! claim) go through `DashMap::entry`, which is the create-if-absent
//! equivalent of a Firestore insert.

use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::error::AppError;
use crate::models::{Event, Message, Nudge, Space, Todo, User};

#[derive(Default)]
struct Inner {
    users: DashMap<String, User>,
    /// email -> user_id
    email_index: DashMap<String, String>,
    /// space_code -> registry record
    spaces: DashMap<String, Space>,
    events: DashMap<String, Event>,
    messages: DashMap<String, Message>,
    todos: DashMap<String, Todo>,
    nudges: DashMap<String, Nudge>,
}

/// In-process database backend.
#[derive(Clone)]
pub struct MemoryDb {
    inner: Arc<Inner>,
}

impl MemoryDb {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner::default()),
        }
    }

    // ─── User Operations ─────────────────────────────────────────

    pub fn create_user(&self, user: &User) -> Result<(), AppError> {
        match self.inner.email_index.entry(user.email.clone()) {
            Entry::Occupied(_) => Err(AppError::DuplicateEmail),
            Entry::Vacant(slot) => {
                slot.insert(user.user_id.clone());
                self.inner.users.insert(user.user_id.clone(), user.clone());
                Ok(())
            }
        }
    }

    pub fn get_user(&self, user_id: &str) -> Result<Option<User>, AppError> {
        Ok(self.inner.users.get(user_id).map(|u| u.clone()))
    }

    pub fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        match self.inner.email_index.get(email) {
            Some(user_id) => self.get_user(&user_id),
            None => Ok(None),
        }
    }

    pub fn update_user(&self, user: &User) -> Result<(), AppError> {
        self.inner.users.insert(user.user_id.clone(), user.clone());
        Ok(())
    }

    pub fn list_space_members(&self, space_id: &str) -> Result<Vec<User>, AppError> {
        Ok(self
            .inner
            .users
            .iter()
            .filter(|entry| entry.value().space_id.as_deref() == Some(space_id))
            .map(|entry| entry.value().clone())
            .collect())
    }

    pub fn delete_user(&self, user: &User) -> Result<(), AppError> {
        self.inner.users.remove(&user.user_id);
        self.inner.email_index.remove(&user.email);
        Ok(())
    }

    // ─── Space Registry Operations ───────────────────────────────

    pub fn claim_space(&self, space: &Space) -> Result<bool, AppError> {
        match self.inner.spaces.entry(space.space_code.clone()) {
            Entry::Occupied(_) => Ok(false),
            Entry::Vacant(slot) => {
                slot.insert(space.clone());
                Ok(true)
            }
        }
    }

    pub fn get_space(&self, space_code: &str) -> Result<Option<Space>, AppError> {
        Ok(self.inner.spaces.get(space_code).map(|s| s.clone()))
    }

    pub fn release_space(&self, space_code: &str) -> Result<(), AppError> {
        self.inner.spaces.remove(space_code);
        Ok(())
    }

    // ─── Event Operations ────────────────────────────────────────

    pub fn set_event(&self, event: &Event) -> Result<(), AppError> {
        self.inner
            .events
            .insert(event.event_id.clone(), event.clone());
        Ok(())
    }

    pub fn get_event(&self, event_id: &str) -> Result<Option<Event>, AppError> {
        Ok(self.inner.events.get(event_id).map(|e| e.clone()))
    }

    pub fn list_events_for_user(&self, user_id: &str) -> Result<Vec<Event>, AppError> {
        let mut events: Vec<Event> = self
            .inner
            .events
            .iter()
            .filter(|entry| entry.value().user_id == user_id)
            .map(|entry| entry.value().clone())
            .collect();
        events.sort_by(|a, b| a.date.cmp(&b.date));
        Ok(events)
    }

    pub fn delete_event(&self, event_id: &str) -> Result<(), AppError> {
        self.inner.events.remove(event_id);
        Ok(())
    }

    // ─── Message Operations ──────────────────────────────────────

    pub fn set_message(&self, message: &Message) -> Result<(), AppError> {
        self.inner
            .messages
            .insert(message.message_id.clone(), message.clone());
        Ok(())
    }

    pub fn get_message(&self, message_id: &str) -> Result<Option<Message>, AppError> {
        Ok(self.inner.messages.get(message_id).map(|m| m.clone()))
    }

    pub fn list_messages_for_user(&self, user_id: &str) -> Result<Vec<Message>, AppError> {
        let mut messages: Vec<Message> = self
            .inner
            .messages
            .iter()
            .filter(|entry| {
                let m = entry.value();
                m.sender_id == user_id || m.recipient_id == user_id
            })
            .map(|entry| entry.value().clone())
            .collect();
        messages.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(messages)
    }

    pub fn delete_message(&self, message_id: &str) -> Result<(), AppError> {
        self.inner.messages.remove(message_id);
        Ok(())
    }

    // ─── Todo Operations ─────────────────────────────────────────

    pub fn set_todo(&self, todo: &Todo) -> Result<(), AppError> {
        self.inner.todos.insert(todo.todo_id.clone(), todo.clone());
        Ok(())
    }

    pub fn get_todo(&self, todo_id: &str) -> Result<Option<Todo>, AppError> {
        Ok(self.inner.todos.get(todo_id).map(|t| t.clone()))
    }

    pub fn list_todos_visible(
        &self,
        user_id: &str,
        space_id: Option<&str>,
    ) -> Result<Vec<Todo>, AppError> {
        let mut todos: Vec<Todo> = self
            .inner
            .todos
            .iter()
            .filter(|entry| {
                let t = entry.value();
                t.user_id == user_id
                    || (t.is_shared && space_id.is_some() && t.space_id.as_deref() == space_id)
            })
            .map(|entry| entry.value().clone())
            .collect();
        todos.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(todos)
    }

    pub fn delete_todo(&self, todo_id: &str) -> Result<(), AppError> {
        self.inner.todos.remove(todo_id);
        Ok(())
    }

    // ─── Nudge Operations ────────────────────────────────────────

    pub fn set_nudge(&self, nudge: &Nudge) -> Result<(), AppError> {
        self.inner
            .nudges
            .insert(nudge.nudge_id.clone(), nudge.clone());
        Ok(())
    }

    pub fn get_nudge(&self, nudge_id: &str) -> Result<Option<Nudge>, AppError> {
        Ok(self.inner.nudges.get(nudge_id).map(|n| n.clone()))
    }

    pub fn list_nudges_for_recipient(&self, recipient_id: &str) -> Result<Vec<Nudge>, AppError> {
        let mut nudges: Vec<Nudge> = self
            .inner
            .nudges
            .iter()
            .filter(|entry| entry.value().recipient_id == recipient_id)
            .map(|entry| entry.value().clone())
            .collect();
        nudges.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(nudges)
    }

    pub fn list_nudges_from_sender(&self, sender_id: &str) -> Result<Vec<Nudge>, AppError> {
        Ok(self
            .inner
            .nudges
            .iter()
            .filter(|entry| entry.value().sender_id == sender_id)
            .map(|entry| entry.value().clone())
            .collect())
    }

    pub fn delete_nudge(&self, nudge_id: &str) -> Result<(), AppError> {
        self.inner.nudges.remove(nudge_id);
        Ok(())
    }
}

impl Default for MemoryDb {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: &str, email: &str) -> User {
        User {
            user_id: id.to_string(),
            email: email.to_string(),
            phone: "555-0100".to_string(),
            name: "Test".to_string(),
            pin: "1234".to_string(),
            space_id: None,
            space_code: None,
            space_name: None,
            is_space_creator: false,
            country1: None,
            country2: None,
            timezone1: None,
            timezone2: None,
            coordinates1: None,
            coordinates2: None,
            fcm_tokens: vec![],
            created_at: "2026-01-01T00:00:00Z".to_string(),
            updated_at: "2026-01-01T00:00:00Z".to_string(),
        }
    }

    #[test]
    fn test_email_claim_is_create_if_absent() {
        let db = MemoryDb::new();
        db.create_user(&user("u1", "a@example.com")).unwrap();

        let err = db.create_user(&user("u2", "a@example.com")).unwrap_err();
        assert!(matches!(err, AppError::DuplicateEmail));

        // Losing claim must not shadow the original account
        let found = db.find_user_by_email("a@example.com").unwrap().unwrap();
        assert_eq!(found.user_id, "u1");
    }

    #[test]
    fn test_email_match_is_case_sensitive_as_stored() {
        let db = MemoryDb::new();
        db.create_user(&user("u1", "Amy@example.com")).unwrap();

        assert!(db.find_user_by_email("amy@example.com").unwrap().is_none());
        assert!(db.find_user_by_email("Amy@example.com").unwrap().is_some());
    }

    #[test]
    fn test_space_code_claim_race() {
        let db = MemoryDb::new();
        let space = Space {
            space_code: "ABC123".to_string(),
            space_id: "s1".to_string(),
            space_name: Some("Family".to_string()),
            creator_id: "u1".to_string(),
            created_at: "2026-01-01T00:00:00Z".to_string(),
        };

        assert!(db.claim_space(&space).unwrap());

        let mut rival = space.clone();
        rival.space_id = "s2".to_string();
        rival.creator_id = "u2".to_string();
        assert!(!db.claim_space(&rival).unwrap());

        // First claimant's record survives
        let stored = db.get_space("ABC123").unwrap().unwrap();
        assert_eq!(stored.space_id, "s1");
    }

    #[test]
    fn test_delete_user_frees_email() {
        let db = MemoryDb::new();
        let u = user("u1", "a@example.com");
        db.create_user(&u).unwrap();
        db.delete_user(&u).unwrap();

        assert!(db.find_user_by_email("a@example.com").unwrap().is_none());
        db.create_user(&user("u2", "a@example.com")).unwrap();
    }
}
