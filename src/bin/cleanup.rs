// SPDX-License-Identifier: MIT

//! Operator-run account cleanup.
//!
//! Deletes an account by email and everything it owns, through the same typed
//! accessors the service uses. When the deleted user was the last member of
//! their space, the space-code registry entry is released so the code cannot
//! dangle unresolvable.
//!
//! Usage: cleanup <email>

use heartlink::config::{Config, StoreBackend};
use heartlink::db::Db;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let email = std::env::args()
        .nth(1)
        .ok_or("usage: cleanup <email>")?;

    let config = Config::from_env()?;
    let db = match config.store_backend {
        StoreBackend::Firestore => Db::firestore(&config.gcp_project_id).await?,
        StoreBackend::Memory => {
            return Err("cleanup requires the Firestore backend".into());
        }
    };

    let Some(user) = db.find_user_by_email(&email).await? else {
        tracing::warn!(email = %email, "No account found");
        return Ok(());
    };

    let space = user.space_id.clone().zip(user.space_code.clone());

    let deleted = db.delete_user_data(&user).await?;
    tracing::info!(user_id = %user.user_id, deleted, "Account deleted");

    // Release the registry entry if the space is now empty.
    if let Some((space_id, space_code)) = space {
        let remaining = db.list_space_members(&space_id).await?;
        if remaining.is_empty() {
            db.release_space(&space_code).await?;
            tracing::info!(space_code = %space_code, "Released empty space code");
        } else {
            tracing::info!(
                space_code = %space_code,
                members = remaining.len(),
                "Space still has members, keeping code"
            );
        }
    }

    Ok(())
}
