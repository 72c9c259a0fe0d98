// SPDX-License-Identifier: MIT

//! Heart Link backend API.
//!
//! Space-scoped identity and access control for small groups sharing
//! countdowns, messages, to-do lists and nudges across a distance.

pub mod config;
pub mod db;
pub mod error;
pub mod guard;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use config::Config;
use db::Db;
use services::{AccountService, SpaceService};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: Db,
    pub accounts: AccountService,
    pub spaces: SpaceService,
}

impl AppState {
    /// Wire up services around a persistence handle.
    pub fn new(config: Config, db: Db) -> Self {
        Self {
            accounts: AccountService::new(db.clone()),
            spaces: SpaceService::new(db.clone()),
            config,
            db,
        }
    }
}
