//! Heart-felt message model.

use serde::{Deserialize, Serialize};

/// A message from one user to another.
///
/// Readable by sender and recipient; only the sender may delete it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Document ID (UUID v4)
    pub message_id: String,
    pub sender_id: String,
    pub recipient_id: String,
    /// Message body
    pub body: String,
    pub created_at: String,
}
