//! User model for storage and API.

use serde::{Deserialize, Serialize};

/// User profile stored in the `users` collection, keyed by `user_id`.
///
/// Space membership is all-or-nothing: `space_id` and `space_code` are either
/// both set or both absent. The space service is the only writer of these
/// fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Opaque stable identity (UUID v4, also the document ID)
    pub user_id: String,
    /// Email address, unique across accounts (matched as stored)
    pub email: String,
    /// Phone number (display only)
    pub phone: String,
    /// Display name
    pub name: String,
    /// 4-digit numeric PIN, stored as entered (not unique across users)
    pub pin: String,

    /// Space membership, populated by create-space / join-space
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub space_id: Option<String>,
    /// 6-character shareable alias for `space_id`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub space_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub space_name: Option<String>,
    /// True only for the user whose create-space call claimed the code
    #[serde(default)]
    pub is_space_creator: bool,

    /// Display widget preferences: two location slots
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country1: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country2: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone1: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone2: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates1: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates2: Option<String>,

    /// Push-notification device tokens (append-only set, one per device)
    #[serde(default)]
    pub fcm_tokens: Vec<String>,

    /// When the account was created (RFC3339)
    pub created_at: String,
    /// Last mutation timestamp (RFC3339)
    pub updated_at: String,
}

impl User {
    /// True once the user belongs to a space.
    pub fn in_space(&self) -> bool {
        self.space_id.is_some()
    }

    /// Append a device token if not already registered.
    pub fn add_fcm_token(&mut self, token: &str) {
        if !self.fcm_tokens.iter().any(|t| t == token) {
            self.fcm_tokens.push(token.to_string());
        }
    }
}
