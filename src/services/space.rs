// SPDX-License-Identifier: MIT

//! Space membership: code generation, create-space, join-space.
//!
//! Codes are claimed in the space registry with a create-if-absent write, so
//! two concurrent create-space calls that generate the same code cannot both
//! win. The registry entry is also what join-space resolves codes against.

use rand::Rng;

use crate::db::Db;
use crate::error::AppError;
use crate::models::{Space, User};

/// Shareable code length: 6 symbols of a 36-symbol alphabet (~31 bits).
pub const CODE_LENGTH: usize = 6;

const CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Bounded regeneration attempts before giving up with `CodeSpaceExhausted`.
const MAX_CLAIM_ATTEMPTS: usize = 5;

/// Space membership service.
#[derive(Clone)]
pub struct SpaceService {
    db: Db,
}

/// Sample a fresh code uniformly from `[A-Z0-9]`.
///
/// The caller must still claim it in the registry; generation alone does not
/// reserve anything.
pub fn generate_code() -> String {
    let mut rng = rand::thread_rng();
    (0..CODE_LENGTH)
        .map(|_| CODE_ALPHABET[rng.gen_range(0..CODE_ALPHABET.len())] as char)
        .collect()
}

/// Normalize a user-supplied code to uppercase and validate its shape.
///
/// Fails with `InvalidCodeFormat` without any lookup when the input is not
/// exactly 6 alphanumeric characters.
pub fn normalize_code(raw: &str) -> Result<String, AppError> {
    let code = raw.trim().to_ascii_uppercase();
    if code.len() != CODE_LENGTH
        || !code
            .bytes()
            .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit())
    {
        return Err(AppError::InvalidCodeFormat);
    }
    Ok(code)
}

impl SpaceService {
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    /// Transition a spaceless user into the creator of a new space.
    ///
    /// This is the only path that sets `is_space_creator`, and the claim it
    /// performs is create-if-absent on a freshly minted space id, so a space
    /// can never end up with two creators.
    pub async fn create_space(
        &self,
        user_id: &str,
        space_name: Option<String>,
    ) -> Result<User, AppError> {
        let mut user = self
            .db
            .get_user(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("user {} not found", user_id)))?;

        if user.in_space() {
            return Err(AppError::AlreadyInSpace);
        }

        let space_id = uuid::Uuid::new_v4().to_string();
        let now = chrono::Utc::now().to_rfc3339();

        let space = self
            .claim_fresh_code(&space_id, space_name.clone(), user_id, &now)
            .await?;

        user.space_id = Some(space.space_id.clone());
        user.space_code = Some(space.space_code.clone());
        user.space_name = space.space_name.clone();
        user.is_space_creator = true;
        user.updated_at = now;
        self.db.update_user(&user).await?;

        tracing::info!(
            user_id = %user.user_id,
            space_code = %space.space_code,
            "Space created"
        );
        Ok(user)
    }

    /// Generate and claim a registry code, regenerating on collision.
    async fn claim_fresh_code(
        &self,
        space_id: &str,
        space_name: Option<String>,
        creator_id: &str,
        now: &str,
    ) -> Result<Space, AppError> {
        self.claim_code_with(generate_code, space_id, space_name, creator_id, now)
            .await
    }

    /// Claim loop over an injectable code source, bounded by
    /// `MAX_CLAIM_ATTEMPTS`.
    async fn claim_code_with<F>(
        &self,
        mut next_code: F,
        space_id: &str,
        space_name: Option<String>,
        creator_id: &str,
        now: &str,
    ) -> Result<Space, AppError>
    where
        F: FnMut() -> String,
    {
        for attempt in 1..=MAX_CLAIM_ATTEMPTS {
            let space = Space {
                space_code: next_code(),
                space_id: space_id.to_string(),
                space_name: space_name.clone(),
                creator_id: creator_id.to_string(),
                created_at: now.to_string(),
            };

            if self.db.claim_space(&space).await? {
                return Ok(space);
            }

            tracing::warn!(
                attempt,
                code = %space.space_code,
                "Space code collision, regenerating"
            );
        }
        Err(AppError::CodeSpaceExhausted)
    }

    /// Join an existing user to the space behind a shareable code.
    ///
    /// The code is normalized to uppercase before lookup. Membership copies
    /// the target space's id/code/name onto the caller; last write wins on
    /// the roster since spaces have no capacity limit.
    pub async fn join_space_for_user(&self, user_id: &str, raw_code: &str) -> Result<User, AppError> {
        let code = normalize_code(raw_code)?;

        let mut user = self
            .db
            .get_user(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("user {} not found", user_id)))?;

        let space = self
            .db
            .get_space(&code)
            .await?
            .ok_or(AppError::SpaceNotFound)?;

        if user.in_space() {
            return Err(AppError::AlreadyInSpace);
        }

        user.space_id = Some(space.space_id.clone());
        user.space_code = Some(space.space_code.clone());
        user.space_name = space.space_name.clone();
        user.is_space_creator = false;
        user.updated_at = chrono::Utc::now().to_rfc3339();
        self.db.update_user(&user).await?;

        tracing::info!(
            user_id = %user.user_id,
            space_code = %code,
            "Joined space"
        );
        Ok(user)
    }

    /// Members of the caller's space, excluding the caller.
    ///
    /// A spaceless user gets an empty list. Never returns cross-space users.
    pub async fn list_partners(&self, user_id: &str) -> Result<Vec<User>, AppError> {
        let user = self
            .db
            .get_user(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("user {} not found", user_id)))?;

        let Some(space_id) = user.space_id.as_deref() else {
            return Ok(vec![]);
        };

        let members = self.db.list_space_members(space_id).await?;
        Ok(members
            .into_iter()
            .filter(|m| m.user_id != user.user_id)
            .collect())
    }
}
