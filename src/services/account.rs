// SPDX-License-Identifier: MIT

//! Credential store: user identity and PIN verification.
//!
//! PINs are 4-digit numeric strings, stored and compared as entered. They are
//! not unique across users. Signup and login never touch space fields.

use crate::db::Db;
use crate::error::AppError;
use crate::models::User;

/// Set of location-slot fields a settings update may change.
#[derive(Debug, Default, Clone)]
pub struct LocationUpdate {
    pub country1: Option<String>,
    pub country2: Option<String>,
    pub timezone1: Option<String>,
    pub timezone2: Option<String>,
    pub coordinates1: Option<String>,
    pub coordinates2: Option<String>,
}

/// Account management service.
#[derive(Clone)]
pub struct AccountService {
    db: Db,
}

/// True when the pin is exactly 4 ASCII digits.
pub fn pin_is_valid(pin: &str) -> bool {
    pin.len() == 4 && pin.bytes().all(|b| b.is_ascii_digit())
}

impl AccountService {
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    /// Create an account with no space assignment.
    ///
    /// PIN format is checked before any store access; a duplicate email fails
    /// with `DuplicateEmail` (matched against the stored value as-is).
    pub async fn signup(
        &self,
        name: &str,
        email: &str,
        phone: &str,
        pin: &str,
    ) -> Result<User, AppError> {
        if !pin_is_valid(pin) {
            return Err(AppError::InvalidPin);
        }

        let now = chrono::Utc::now().to_rfc3339();
        let user = User {
            user_id: uuid::Uuid::new_v4().to_string(),
            email: email.to_string(),
            phone: phone.to_string(),
            name: name.to_string(),
            pin: pin.to_string(),
            space_id: None,
            space_code: None,
            space_name: None,
            is_space_creator: false,
            country1: None,
            country2: None,
            timezone1: None,
            timezone2: None,
            coordinates1: None,
            coordinates2: None,
            fcm_tokens: vec![],
            created_at: now.clone(),
            updated_at: now,
        };

        self.db.create_user(&user).await?;

        tracing::info!(user_id = %user.user_id, "Account created");
        Ok(user)
    }

    /// Verify email + PIN.
    ///
    /// A malformed PIN fails before the store is consulted. When `name` is
    /// supplied, the stored display name is overwritten as a side effect
    /// (longstanding client behavior). Space fields are never touched.
    pub async fn login(
        &self,
        email: &str,
        pin: &str,
        name: Option<&str>,
    ) -> Result<User, AppError> {
        if !pin_is_valid(pin) {
            return Err(AppError::InvalidCredentials);
        }

        let mut user = self
            .db
            .find_user_by_email(email)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("no account for {}", email)))?;

        if user.pin != pin {
            return Err(AppError::InvalidCredentials);
        }

        if let Some(name) = name {
            if !name.is_empty() && name != user.name {
                user.name = name.to_string();
                user.updated_at = chrono::Utc::now().to_rfc3339();
                self.db.update_user(&user).await?;
            }
        }

        tracing::debug!(user_id = %user.user_id, "Login successful");
        Ok(user)
    }

    /// Append a push-notification device token to the user's set.
    pub async fn register_fcm_token(&self, user_id: &str, token: &str) -> Result<User, AppError> {
        let mut user = self
            .db
            .get_user(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("user {} not found", user_id)))?;

        user.add_fcm_token(token);
        user.updated_at = chrono::Utc::now().to_rfc3339();
        self.db.update_user(&user).await?;
        Ok(user)
    }

    /// Update the display-widget location slots.
    pub async fn update_locations(
        &self,
        user_id: &str,
        update: LocationUpdate,
    ) -> Result<User, AppError> {
        let mut user = self
            .db
            .get_user(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("user {} not found", user_id)))?;

        if update.country1.is_some() {
            user.country1 = update.country1;
        }
        if update.country2.is_some() {
            user.country2 = update.country2;
        }
        if update.timezone1.is_some() {
            user.timezone1 = update.timezone1;
        }
        if update.timezone2.is_some() {
            user.timezone2 = update.timezone2;
        }
        if update.coordinates1.is_some() {
            user.coordinates1 = update.coordinates1;
        }
        if update.coordinates2.is_some() {
            user.coordinates2 = update.coordinates2;
        }
        user.updated_at = chrono::Utc::now().to_rfc3339();
        self.db.update_user(&user).await?;
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> AccountService {
        AccountService::new(Db::memory())
    }

    #[test]
    fn test_pin_format() {
        assert!(pin_is_valid("0000"));
        assert!(pin_is_valid("1234"));
        assert!(!pin_is_valid("123"));
        assert!(!pin_is_valid("12345"));
        assert!(!pin_is_valid("12a4"));
        assert!(!pin_is_valid(""));
        // Non-ASCII digits are rejected
        assert!(!pin_is_valid("١٢٣٤"));
    }

    #[tokio::test]
    async fn test_signup_rejects_bad_pin_before_store() {
        let svc = service();
        let err = svc
            .signup("Alice", "a@example.com", "555-0100", "12x4")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidPin));

        // Nothing was persisted
        let db = svc.db.clone();
        assert!(db.find_user_by_email("a@example.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_signup_duplicate_email() {
        let svc = service();
        svc.signup("Alice", "a@example.com", "555-0100", "1234")
            .await
            .unwrap();
        let err = svc
            .signup("Other", "a@example.com", "555-0101", "9999")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::DuplicateEmail));
    }

    #[tokio::test]
    async fn test_login_distinguishes_internally() {
        let svc = service();
        svc.signup("Alice", "a@example.com", "555-0100", "1234")
            .await
            .unwrap();

        let unknown = svc.login("b@example.com", "1234", None).await.unwrap_err();
        assert!(matches!(unknown, AppError::NotFound(_)));

        let wrong_pin = svc.login("a@example.com", "4321", None).await.unwrap_err();
        assert!(matches!(wrong_pin, AppError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_login_overwrites_name() {
        let svc = service();
        svc.signup("Alice", "a@example.com", "555-0100", "1234")
            .await
            .unwrap();

        let user = svc
            .login("a@example.com", "1234", Some("Ali"))
            .await
            .unwrap();
        assert_eq!(user.name, "Ali");

        // Persisted, and space fields untouched
        let stored = svc.db.get_user(&user.user_id).await.unwrap().unwrap();
        assert_eq!(stored.name, "Ali");
        assert!(stored.space_id.is_none());
        assert!(stored.space_code.is_none());
    }

    #[tokio::test]
    async fn test_fcm_token_registration() {
        let svc = service();
        let user = svc
            .signup("Alice", "a@example.com", "555-0100", "1234")
            .await
            .unwrap();

        svc.register_fcm_token(&user.user_id, "device-a").await.unwrap();
        let updated = svc.register_fcm_token(&user.user_id, "device-a").await.unwrap();
        assert_eq!(updated.fcm_tokens, vec!["device-a"]);
    }
}
