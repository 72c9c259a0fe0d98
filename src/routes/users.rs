// SPDX-License-Identifier: MIT

//! User routes: signup, login, space membership, settings.

use axum::{
    extract::{Path, Query, State},
    routing::{get, post, put},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

use crate::error::{AppError, Result};
use crate::middleware::auth::{create_session_token, AuthUser};
use crate::models::User;
use crate::routes::{ok, Envelope};
use crate::services::account::LocationUpdate;
use crate::AppState;

/// Routes that do not require a session token.
pub fn public_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/users/signup", post(signup))
        .route("/users/login", post(login))
        .route("/users/join-space", post(signup_and_join))
}

/// Routes gated by the session middleware (applied in routes/mod.rs).
pub fn protected_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/users", get(list_partners))
        .route("/users/{user_id}/create-space", post(create_space))
        .route("/users/{user_id}/join-space", post(join_space))
        .route("/users/{user_id}/countries", put(update_countries))
        .route("/users/{user_id}/fcm-token", post(register_fcm_token))
}

// ─── Payloads ────────────────────────────────────────────────

/// Public view of a user record. Never includes the PIN or device tokens.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(ts_rs::TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct UserResponse {
    pub user_id: String,
    pub email: String,
    pub phone: String,
    pub name: String,
    pub space_id: Option<String>,
    pub space_code: Option<String>,
    pub space_name: Option<String>,
    pub is_space_creator: bool,
    pub country1: Option<String>,
    pub country2: Option<String>,
    pub timezone1: Option<String>,
    pub timezone2: Option<String>,
    pub coordinates1: Option<String>,
    pub coordinates2: Option<String>,
    pub created_at: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            user_id: user.user_id,
            email: user.email,
            phone: user.phone,
            name: user.name,
            space_id: user.space_id,
            space_code: user.space_code,
            space_name: user.space_name,
            is_space_creator: user.is_space_creator,
            country1: user.country1,
            country2: user.country2,
            timezone1: user.timezone1,
            timezone2: user.timezone2,
            coordinates1: user.coordinates1,
            coordinates2: user.coordinates2,
            created_at: user.created_at,
        }
    }
}

/// Signup/login response: the user plus an opaque session token.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(ts_rs::TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct AuthResponse {
    pub user: UserResponse,
    pub token: String,
}

#[derive(Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(max = 32))]
    #[serde(default)]
    pub phone: String,
    pub pin: String,
}

#[derive(Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    pub pin: String,
    /// Optional display-name overwrite applied on successful login
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Deserialize, Validate)]
pub struct SignupJoinRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(max = 32))]
    #[serde(default)]
    pub phone: String,
    pub pin: String,
    #[serde(rename = "spaceCode")]
    pub space_code: String,
}

#[derive(Deserialize)]
pub struct CreateSpaceRequest {
    #[serde(rename = "spaceName", default)]
    pub space_name: Option<String>,
}

#[derive(Deserialize)]
pub struct JoinSpaceRequest {
    #[serde(rename = "spaceCode")]
    pub space_code: String,
}

#[derive(Deserialize)]
pub struct PartnersQuery {
    #[serde(rename = "userId")]
    pub user_id: String,
}

#[derive(Deserialize)]
pub struct CountriesRequest {
    pub country1: Option<String>,
    pub country2: Option<String>,
    pub timezone1: Option<String>,
    pub timezone2: Option<String>,
    pub coordinates1: Option<String>,
    pub coordinates2: Option<String>,
}

#[derive(Deserialize, Validate)]
pub struct FcmTokenRequest {
    #[validate(length(min = 1, max = 512))]
    pub token: String,
}

fn validate(payload: &impl Validate) -> Result<()> {
    payload
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))
}

/// Path user must be the session user; cross-user calls are a guard denial.
fn require_self(auth: &AuthUser, user_id: &str) -> Result<()> {
    crate::guard::require(auth.user_id == user_id)
}

// ─── Handlers ────────────────────────────────────────────────

/// Create an account and issue a session token.
async fn signup(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<SignupRequest>,
) -> Result<Json<Envelope<AuthResponse>>> {
    validate(&payload)?;

    let user = state
        .accounts
        .signup(&payload.name, &payload.email, &payload.phone, &payload.pin)
        .await?;

    let token = create_session_token(&user.user_id, &state.config.jwt_signing_key)?;
    Ok(ok(AuthResponse {
        user: user.into(),
        token,
    }))
}

/// Authenticate by email + PIN.
///
/// Unknown email and wrong PIN both surface as the same 401 so responses do
/// not reveal whether an email has an account.
async fn login(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<Envelope<AuthResponse>>> {
    validate(&payload)?;

    let user = state
        .accounts
        .login(&payload.email, &payload.pin, payload.name.as_deref())
        .await
        .map_err(|e| match e {
            AppError::NotFound(_) => AppError::InvalidCredentials,
            other => other,
        })?;

    let token = create_session_token(&user.user_id, &state.config.jwt_signing_key)?;
    Ok(ok(AuthResponse {
        user: user.into(),
        token,
    }))
}

/// Composite signup + join.
///
/// Not transactional: if the join half fails the account is already persisted
/// and stays spaceless; recovery is a later join-space call with the same
/// credentials. The join error is returned to the caller as-is.
async fn signup_and_join(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<SignupJoinRequest>,
) -> Result<Json<Envelope<AuthResponse>>> {
    validate(&payload)?;

    let user = state
        .accounts
        .signup(&payload.name, &payload.email, &payload.phone, &payload.pin)
        .await?;

    let joined = state
        .spaces
        .join_space_for_user(&user.user_id, &payload.space_code)
        .await?;

    let token = create_session_token(&joined.user_id, &state.config.jwt_signing_key)?;
    Ok(ok(AuthResponse {
        user: joined.into(),
        token,
    }))
}

/// Create a new space with the caller as creator.
async fn create_space(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(user_id): Path<String>,
    Json(payload): Json<CreateSpaceRequest>,
) -> Result<Json<Envelope<UserResponse>>> {
    require_self(&auth, &user_id)?;

    let user = state
        .spaces
        .create_space(&user_id, payload.space_name)
        .await?;
    Ok(ok(user.into()))
}

/// Join an existing space by shareable code.
async fn join_space(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(user_id): Path<String>,
    Json(payload): Json<JoinSpaceRequest>,
) -> Result<Json<Envelope<UserResponse>>> {
    require_self(&auth, &user_id)?;

    let user = state
        .spaces
        .join_space_for_user(&user_id, &payload.space_code)
        .await?;
    Ok(ok(user.into()))
}

/// List the members of the caller's space, excluding the caller.
///
/// Space-scoped: never returns users from another space, and a spaceless
/// caller gets an empty list.
async fn list_partners(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Query(query): Query<PartnersQuery>,
) -> Result<Json<Envelope<Vec<UserResponse>>>> {
    require_self(&auth, &query.user_id)?;

    let partners = state.spaces.list_partners(&query.user_id).await?;
    Ok(ok(partners.into_iter().map(UserResponse::from).collect()))
}

/// Update the display-widget location slots.
async fn update_countries(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(user_id): Path<String>,
    Json(payload): Json<CountriesRequest>,
) -> Result<Json<Envelope<UserResponse>>> {
    require_self(&auth, &user_id)?;

    let update = LocationUpdate {
        country1: payload.country1,
        country2: payload.country2,
        timezone1: payload.timezone1,
        timezone2: payload.timezone2,
        coordinates1: payload.coordinates1,
        coordinates2: payload.coordinates2,
    };
    let user = state.accounts.update_locations(&user_id, update).await?;
    Ok(ok(user.into()))
}

/// Register a push-notification device token (append-only set).
async fn register_fcm_token(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(user_id): Path<String>,
    Json(payload): Json<FcmTokenRequest>,
) -> Result<Json<Envelope<UserResponse>>> {
    require_self(&auth, &user_id)?;
    validate(&payload)?;

    let user = state
        .accounts
        .register_fcm_token(&user_id, &payload.token)
        .await?;
    Ok(ok(user.into()))
}
