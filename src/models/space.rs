//! Space registry record.

use serde::{Deserialize, Serialize};

/// Registry entry for an active space, keyed by its shareable code.
///
/// The registry document is the create-if-absent claim target for freshly
/// generated codes, which closes the race between two concurrent create-space
/// calls generating the same code. It is also what join-space resolves codes
/// against, so a code stays resolvable even if the creator's user record is
/// later deleted while members remain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Space {
    /// 6-character shareable code, uppercase A-Z/0-9 (also the document ID)
    pub space_code: String,
    /// Opaque id shared by all members (UUID v4)
    pub space_id: String,
    /// Free-text name chosen by the creator
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub space_name: Option<String>,
    /// User who created the space
    pub creator_id: String,
    /// When the space was created (RFC3339)
    pub created_at: String,
}
