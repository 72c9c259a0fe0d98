//! Nudge notification model.

use serde::{Deserialize, Serialize};

/// A lightweight nudge from one user to another.
///
/// Delivery to devices is handled by an external push service; this record is
/// the at-least-once source of truth the recipient's inbox polls.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Nudge {
    /// Document ID (UUID v4)
    pub nudge_id: String,
    pub sender_id: String,
    pub recipient_id: String,
    /// Nudge kind, e.g. "miss_you" or "thinking_of_you"
    pub kind: String,
    /// Whether the recipient has acknowledged the nudge
    #[serde(default)]
    pub seen: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seen_at: Option<String>,
    pub created_at: String,
}
