//! User accounts and session state.
//!
//! Accounts live in the `users` table; the logged-in user and the
//! remember-me flags live in the kv table. Passwords are stored as salted
//! SHA-256 digests, never plaintext.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::error::{AuthError, CoreError, Result, ValidationError};
use crate::storage::Database;

const KEY_CURRENT_USER: &str = "session.current_user";
const KEY_REMEMBER_ME: &str = "session.remember_me";
const KEY_LAST_EMAIL: &str = "session.last_email";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    /// `"{salt}${hex digest}"`.
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub preferences: HashMap<String, String>,
}

impl User {
    pub fn new(email: &str, username: &str, password: &str) -> Self {
        let salt = Uuid::new_v4().simple().to_string();
        Self {
            id: Uuid::new_v4(),
            email: email.trim().to_string(),
            username: username.trim().to_string(),
            password_hash: format!("{salt}${}", digest(&salt, password)),
            created_at: Utc::now(),
            preferences: HashMap::new(),
        }
    }

    pub fn verify_password(&self, password: &str) -> bool {
        match self.password_hash.split_once('$') {
            Some((salt, hash)) => digest(salt, password) == hash,
            None => false,
        }
    }
}

fn digest(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

/// Account operations over the database and kv session state.
pub struct Accounts<'a> {
    db: &'a Database,
}

impl<'a> Accounts<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Register a new account. Emails are unique case-insensitively.
    pub fn register(&self, email: &str, username: &str, password: &str) -> Result<User> {
        if self.db.user_by_email(email)?.is_some() {
            return Err(AuthError::EmailTaken(email.to_string()).into());
        }
        let user = User::new(email, username, password);
        self.db.create_user(&user)?;
        Ok(user)
    }

    /// Log in and persist the session. `remember` keeps the email for the
    /// next login prompt.
    pub fn login(&self, email: &str, password: &str, remember: bool) -> Result<User> {
        let user = self
            .db
            .user_by_email(email)?
            .filter(|u| u.verify_password(password))
            .ok_or(AuthError::InvalidCredentials)?;
        self.db.kv_set(KEY_CURRENT_USER, &user.id.to_string())?;
        self.db.kv_set(KEY_REMEMBER_ME, if remember { "true" } else { "false" })?;
        self.db.kv_set(KEY_LAST_EMAIL, &user.email)?;
        Ok(user)
    }

    pub fn logout(&self) -> Result<()> {
        self.db.kv_remove(KEY_CURRENT_USER)?;
        self.db.kv_set(KEY_REMEMBER_ME, "false")?;
        Ok(())
    }

    /// The currently logged-in user, if any.
    pub fn current(&self) -> Result<Option<User>> {
        let Some(id) = self.db.kv_get(KEY_CURRENT_USER)? else {
            return Ok(None);
        };
        let Some(email) = self.db.kv_get(KEY_LAST_EMAIL)? else {
            return Ok(None);
        };
        let user = self.db.user_by_email(&email)?;
        Ok(user.filter(|u| u.id.to_string() == id))
    }

    /// Update the profile for `email`. A new password is re-salted.
    pub fn update(
        &self,
        email: &str,
        username: Option<&str>,
        password: Option<&str>,
    ) -> Result<User> {
        let mut user = self
            .db
            .user_by_email(email)?
            .ok_or_else(|| CoreError::from(AuthError::UnknownUser(email.to_string())))?;
        if let Some(name) = username {
            if name.trim().is_empty() {
                return Err(ValidationError::Empty("username").into());
            }
            user.username = name.trim().to_string();
        }
        if let Some(password) = password {
            let salt = Uuid::new_v4().simple().to_string();
            user.password_hash = format!("{salt}${}", digest(&salt, password));
        }
        self.db.update_user(&user)?;
        Ok(user)
    }

    pub fn remember_me(&self) -> Result<bool> {
        Ok(self.db.kv_get(KEY_REMEMBER_ME)?.as_deref() == Some("true"))
    }

    pub fn last_email(&self) -> Result<Option<String>> {
        Ok(self.db.kv_get(KEY_LAST_EMAIL)?)
    }

    /// Delete the account for `email`; logs out if it is the current one.
    pub fn delete(&self, email: &str) -> Result<()> {
        let user = self
            .db
            .user_by_email(email)?
            .ok_or_else(|| CoreError::from(AuthError::UnknownUser(email.to_string())))?;
        let current = self.current()?;
        self.db.delete_user(&user.id.to_string())?;
        if current.is_some_and(|c| c.id == user.id) {
            self.logout()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn db() -> Database {
        Database::open_memory().unwrap()
    }

    #[test]
    fn password_hash_is_salted_and_verifies() {
        let a = User::new("a@example.com", "A", "secret");
        let b = User::new("b@example.com", "B", "secret");
        assert_ne!(a.password_hash, b.password_hash);
        assert!(!a.password_hash.contains("secret"));
        assert!(a.verify_password("secret"));
        assert!(!a.verify_password("wrong"));
    }

    #[test]
    fn duplicate_email_is_rejected_case_insensitively() {
        let db = db();
        let accounts = Accounts::new(&db);
        accounts.register("demo@habitflow.dev", "Demo", "123456").unwrap();
        let err = accounts
            .register("DEMO@habitflow.dev", "Other", "abcdef")
            .unwrap_err();
        assert!(matches!(err, CoreError::Auth(AuthError::EmailTaken(_))));
    }

    #[test]
    fn login_logout_session_flow() {
        let db = db();
        let accounts = Accounts::new(&db);
        accounts.register("demo@habitflow.dev", "Demo", "123456").unwrap();

        assert!(accounts
            .login("demo@habitflow.dev", "wrong", false)
            .is_err());

        let user = accounts.login("demo@habitflow.dev", "123456", true).unwrap();
        assert_eq!(accounts.current().unwrap().unwrap().id, user.id);
        assert!(accounts.remember_me().unwrap());
        assert_eq!(
            accounts.last_email().unwrap().as_deref(),
            Some("demo@habitflow.dev")
        );

        accounts.logout().unwrap();
        assert!(accounts.current().unwrap().is_none());
        assert!(!accounts.remember_me().unwrap());
        // Last email is kept for the next login prompt.
        assert!(accounts.last_email().unwrap().is_some());
    }

    #[test]
    fn update_changes_username_and_invalidates_old_password() {
        let db = db();
        let accounts = Accounts::new(&db);
        accounts.register("demo@habitflow.dev", "Demo", "123456").unwrap();

        let updated = accounts
            .update("demo@habitflow.dev", Some("Renamed"), Some("abcdef"))
            .unwrap();
        assert_eq!(updated.username, "Renamed");

        assert!(accounts.login("demo@habitflow.dev", "123456", false).is_err());
        let user = accounts.login("demo@habitflow.dev", "abcdef", false).unwrap();
        assert_eq!(user.username, "Renamed");

        assert!(matches!(
            accounts.update("demo@habitflow.dev", Some("   "), None).unwrap_err(),
            CoreError::Validation(ValidationError::Empty(_))
        ));
        assert!(matches!(
            accounts.update("nobody@habitflow.dev", None, None).unwrap_err(),
            CoreError::Auth(AuthError::UnknownUser(_))
        ));
    }

    #[test]
    fn deleting_current_user_logs_out() {
        let db = db();
        let accounts = Accounts::new(&db);
        accounts.register("demo@habitflow.dev", "Demo", "123456").unwrap();
        accounts.login("demo@habitflow.dev", "123456", false).unwrap();
        accounts.delete("demo@habitflow.dev").unwrap();
        assert!(accounts.current().unwrap().is_none());
        assert!(matches!(
            accounts.delete("demo@habitflow.dev").unwrap_err(),
            CoreError::Auth(AuthError::UnknownUser(_))
        ));
    }
}
