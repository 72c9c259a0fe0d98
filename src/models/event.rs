//! Countdown event model.

use serde::{Deserialize, Serialize};

/// A countdown event. Always private to its owner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    /// Document ID (UUID v4)
    pub event_id: String,
    /// Owning user
    pub user_id: String,
    /// Event title shown on the countdown card
    pub title: String,
    /// Target date (RFC3339)
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}
