//! Demo login gate.
//!
//! There are no accounts. Any non-blank email and password are accepted,
//! and the resulting user is remembered in durable storage until logout.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::storage::{DurableStorage, StorageError};

/// Entry name holding the logged-in user.
pub const AUTH_ENTRY_NAME: &str = "auth-user";

/// Errors from the login gate.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Email or password was blank.
    #[error("email and password are required")]
    MissingCredentials,

    /// The session could not be encoded.
    #[error("failed to encode session: {0}")]
    Encode(#[from] serde_json::Error),

    /// The session could not be written or cleared.
    #[error("failed to store session: {0}")]
    Storage(#[from] StorageError),
}

/// The signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub email: String,
    pub name: String,
}

impl User {
    /// Builds a user whose display name is the email's local part.
    pub fn from_email(email: &str) -> Self {
        let email = email.trim();
        let name = match email.split_once('@') {
            Some((local, _)) if !local.is_empty() => local,
            _ => email,
        };

        Self {
            email: email.to_string(),
            name: name.to_string(),
        }
    }
}

/// Login state backed by durable storage.
pub struct AuthGate<S: DurableStorage> {
    storage: S,
}

impl<S: DurableStorage> AuthGate<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Signs in. The password is only checked for presence.
    pub fn login(&self, email: &str, password: &str) -> Result<User, AuthError> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(AuthError::MissingCredentials);
        }

        let user = User::from_email(email);
        let json = serde_json::to_string(&user)?;
        self.storage.set_item(AUTH_ENTRY_NAME, &json)?;

        tracing::info!("Signed in as {}", user.email);
        Ok(user)
    }

    /// The signed-in user, if any. A corrupt entry counts as signed out.
    pub fn current_user(&self) -> Option<User> {
        let json = match self.storage.get_item(AUTH_ENTRY_NAME) {
            Ok(Some(json)) => json,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!("Failed to read session: {}", e);
                return None;
            }
        };

        match serde_json::from_str(&json) {
            Ok(user) => Some(user),
            Err(e) => {
                tracing::warn!("Discarding corrupt session: {}", e);
                None
            }
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.current_user().is_some()
    }

    /// Signs out. Signing out twice is fine.
    pub fn logout(&self) -> Result<(), AuthError> {
        self.storage.remove_item(AUTH_ENTRY_NAME)?;
        tracing::info!("Signed out");
        Ok(())
    }
}
