// SPDX-License-Identifier: MIT

//! Firestore client wrapper with typed operations.
//!
//! Every collection is accessed through typed record structs; no schema-less
//! documents, including in the cleanup tool. Uniqueness-bearing writes (email
//! index, space registry) use Firestore `insert`, which fails on an existing
//! document, so collision checks happen at write time rather than
//! read-then-write.

use firestore::errors::FirestoreError;
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::db::collections;
use crate::error::AppError;
use crate::models::{Event, Message, Nudge, Space, Todo, User};

/// Email uniqueness index entry, keyed by the stored email.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct EmailIndexEntry {
    email: String,
    user_id: String,
}

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    client: firestore::FirestoreDb,
}

fn is_already_exists(err: &FirestoreError) -> bool {
    matches!(err, FirestoreError::DataConflictError(_))
}

impl FirestoreDb {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        // If the emulator environment variable is set, use unauthenticated
        // connection to avoid local credential warnings and leakage.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self { client })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self { client })
    }

    // ─── Typed Document Helpers ──────────────────────────────────

    async fn fetch<T>(&self, collection: &str, doc_id: &str) -> Result<Option<T>, AppError>
    where
        T: DeserializeOwned + Send,
    {
        self.client
            .fluent()
            .select()
            .by_id_in(collection)
            .obj()
            .one(doc_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    async fn store<T>(&self, collection: &str, doc_id: &str, object: &T) -> Result<(), AppError>
    where
        T: Serialize + DeserializeOwned + Sync + Send,
    {
        let _: () = self
            .client
            .fluent()
            .update()
            .in_col(collection)
            .document_id(doc_id)
            .object(object)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Create-if-absent write. Returns `false` if the document already exists.
    async fn insert_new<T>(&self, collection: &str, doc_id: &str, object: &T) -> Result<bool, AppError>
    where
        T: Serialize + DeserializeOwned + Sync + Send,
    {
        let result: Result<T, FirestoreError> = self
            .client
            .fluent()
            .insert()
            .into(collection)
            .document_id(doc_id)
            .object(object)
            .execute()
            .await;

        match result {
            Ok(_) => Ok(true),
            Err(e) if is_already_exists(&e) => Ok(false),
            Err(e) => Err(AppError::Database(e.to_string())),
        }
    }

    async fn remove(&self, collection: &str, doc_id: &str) -> Result<(), AppError> {
        self.client
            .fluent()
            .delete()
            .from(collection)
            .document_id(doc_id)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Equality query on a single field.
    ///
    /// Results are sorted by the caller; single-field filters avoid the
    /// composite indexes an order_by would require.
    async fn query_eq<T>(&self, collection: &str, field: &str, value: &str) -> Result<Vec<T>, AppError>
    where
        T: DeserializeOwned + Send,
    {
        let field = field.to_string();
        let value = value.to_string();
        self.client
            .fluent()
            .select()
            .from(collection)
            .filter(move |q| q.field(field.clone()).eq(value.clone()))
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    // ─── User Operations ─────────────────────────────────────────

    /// Create a user, claiming the email in the uniqueness index first.
    pub async fn create_user(&self, user: &User) -> Result<(), AppError> {
        let entry = EmailIndexEntry {
            email: user.email.clone(),
            user_id: user.user_id.clone(),
        };

        if !self
            .insert_new(collections::EMAIL_INDEX, &user.email, &entry)
            .await?
        {
            return Err(AppError::DuplicateEmail);
        }

        // The user id is freshly minted, so this insert cannot conflict.
        if !self
            .insert_new(collections::USERS, &user.user_id, user)
            .await?
        {
            return Err(AppError::Database(format!(
                "user document {} already exists",
                user.user_id
            )));
        }
        Ok(())
    }

    pub async fn get_user(&self, user_id: &str) -> Result<Option<User>, AppError> {
        self.fetch(collections::USERS, user_id).await
    }

    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let entry: Option<EmailIndexEntry> = self.fetch(collections::EMAIL_INDEX, email).await?;
        match entry {
            Some(entry) => self.get_user(&entry.user_id).await,
            None => Ok(None),
        }
    }

    pub async fn update_user(&self, user: &User) -> Result<(), AppError> {
        self.store(collections::USERS, &user.user_id, user).await
    }

    pub async fn list_space_members(&self, space_id: &str) -> Result<Vec<User>, AppError> {
        self.query_eq(collections::USERS, "space_id", space_id).await
    }

    pub async fn delete_user(&self, user: &User) -> Result<(), AppError> {
        self.remove(collections::USERS, &user.user_id).await?;
        self.remove(collections::EMAIL_INDEX, &user.email).await
    }

    // ─── Space Registry Operations ───────────────────────────────

    pub async fn claim_space(&self, space: &Space) -> Result<bool, AppError> {
        self.insert_new(collections::SPACES, &space.space_code, space)
            .await
    }

    pub async fn get_space(&self, space_code: &str) -> Result<Option<Space>, AppError> {
        self.fetch(collections::SPACES, space_code).await
    }

    pub async fn release_space(&self, space_code: &str) -> Result<(), AppError> {
        self.remove(collections::SPACES, space_code).await
    }

    // ─── Event Operations ────────────────────────────────────────

    pub async fn set_event(&self, event: &Event) -> Result<(), AppError> {
        self.store(collections::EVENTS, &event.event_id, event).await
    }

    pub async fn get_event(&self, event_id: &str) -> Result<Option<Event>, AppError> {
        self.fetch(collections::EVENTS, event_id).await
    }

    pub async fn list_events_for_user(&self, user_id: &str) -> Result<Vec<Event>, AppError> {
        let mut events: Vec<Event> = self.query_eq(collections::EVENTS, "user_id", user_id).await?;
        events.sort_by(|a, b| a.date.cmp(&b.date));
        Ok(events)
    }

    pub async fn delete_event(&self, event_id: &str) -> Result<(), AppError> {
        self.remove(collections::EVENTS, event_id).await
    }

    // ─── Message Operations ──────────────────────────────────────

    pub async fn set_message(&self, message: &Message) -> Result<(), AppError> {
        self.store(collections::MESSAGES, &message.message_id, message)
            .await
    }

    pub async fn get_message(&self, message_id: &str) -> Result<Option<Message>, AppError> {
        self.fetch(collections::MESSAGES, message_id).await
    }

    /// Sender-side and recipient-side queries run concurrently and are merged
    /// newest first.
    pub async fn list_messages_for_user(&self, user_id: &str) -> Result<Vec<Message>, AppError> {
        let (sent, received) = futures_util::try_join!(
            self.query_eq::<Message>(collections::MESSAGES, "sender_id", user_id),
            self.query_eq::<Message>(collections::MESSAGES, "recipient_id", user_id),
        )?;

        let mut messages = sent;
        // Self-addressed messages would appear in both result sets.
        for message in received {
            if !messages.iter().any(|m| m.message_id == message.message_id) {
                messages.push(message);
            }
        }
        messages.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(messages)
    }

    pub async fn delete_message(&self, message_id: &str) -> Result<(), AppError> {
        self.remove(collections::MESSAGES, message_id).await
    }

    // ─── Todo Operations ─────────────────────────────────────────

    pub async fn set_todo(&self, todo: &Todo) -> Result<(), AppError> {
        self.store(collections::TODOS, &todo.todo_id, todo).await
    }

    pub async fn get_todo(&self, todo_id: &str) -> Result<Option<Todo>, AppError> {
        self.fetch(collections::TODOS, todo_id).await
    }

    /// Own todos plus shared todos in the caller's space, merged newest first.
    pub async fn list_todos_visible(
        &self,
        user_id: &str,
        space_id: Option<&str>,
    ) -> Result<Vec<Todo>, AppError> {
        let own: Vec<Todo> = self.query_eq(collections::TODOS, "user_id", user_id).await?;

        let mut todos = own;
        if let Some(space_id) = space_id {
            let shared = self.query_shared_todos(space_id).await?;
            for todo in shared {
                if !todos.iter().any(|t| t.todo_id == todo.todo_id) {
                    todos.push(todo);
                }
            }
        }
        todos.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(todos)
    }

    async fn query_shared_todos(&self, space_id: &str) -> Result<Vec<Todo>, AppError> {
        let space_id = space_id.to_string();
        self.client
            .fluent()
            .select()
            .from(collections::TODOS)
            .filter(move |q| {
                q.for_all([
                    q.field("space_id").eq(space_id.clone()),
                    q.field("is_shared").eq(true),
                ])
            })
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    pub async fn delete_todo(&self, todo_id: &str) -> Result<(), AppError> {
        self.remove(collections::TODOS, todo_id).await
    }

    // ─── Nudge Operations ────────────────────────────────────────

    pub async fn set_nudge(&self, nudge: &Nudge) -> Result<(), AppError> {
        self.store(collections::NUDGES, &nudge.nudge_id, nudge).await
    }

    pub async fn get_nudge(&self, nudge_id: &str) -> Result<Option<Nudge>, AppError> {
        self.fetch(collections::NUDGES, nudge_id).await
    }

    pub async fn list_nudges_for_recipient(
        &self,
        recipient_id: &str,
    ) -> Result<Vec<Nudge>, AppError> {
        let mut nudges: Vec<Nudge> = self
            .query_eq(collections::NUDGES, "recipient_id", recipient_id)
            .await?;
        nudges.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(nudges)
    }

    pub async fn list_nudges_from_sender(&self, sender_id: &str) -> Result<Vec<Nudge>, AppError> {
        self.query_eq(collections::NUDGES, "sender_id", sender_id)
            .await
    }

    pub async fn delete_nudge(&self, nudge_id: &str) -> Result<(), AppError> {
        self.remove(collections::NUDGES, nudge_id).await
    }
}
