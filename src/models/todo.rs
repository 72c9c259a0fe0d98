//! To-do item model.

use serde::{Deserialize, Serialize};

/// A to-do item, either personal or shared with the owner's space.
///
/// `space_id` is recorded at creation time when the item is shared so the
/// access rule stays valid even if the owner later changes spaces.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Todo {
    /// Document ID (UUID v4)
    pub todo_id: String,
    /// Owning user
    pub user_id: String,
    /// Space the item is shared with, set only when `is_shared` is true
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub space_id: Option<String>,
    /// Visible to all members of `space_id` when true
    #[serde(default)]
    pub is_shared: bool,
    /// Item text
    pub text: String,
    #[serde(default)]
    pub done: bool,
    pub created_at: String,
    pub updated_at: String,
}
