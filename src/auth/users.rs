//! # User Directory
//!
//! Users live in the store keyed by username with plaintext `username`
//! and `password` fields.

use std::sync::Arc;

use subtle::ConstantTimeEq;
use tracing::debug;

use crate::store::{Collection, DocumentStore, FieldValue};

use super::basic::Credentials;
use super::errors::{AuthError, AuthResult};

pub const USERNAME_FIELD: &str = "username";
pub const PASSWORD_FIELD: &str = "password";

#[derive(Debug, Clone)]
pub struct UserDirectory {
    store: Arc<dyn DocumentStore>,
}

impl UserDirectory {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Check credentials against the stored user.
    ///
    /// Any lookup failure counts as a rejection.
    pub async fn verify(&self, credentials: &Credentials) -> AuthResult<()> {
        let user = match self.store.get(Collection::Users, &credentials.username).await {
            Ok(user) => user,
            Err(e) => {
                debug!(username = %credentials.username, error = %e, "user lookup failed");
                return Err(AuthError::InvalidCredentials);
            }
        };

        let matches = |name: &str, supplied: &str| {
            user.field(name)
                .and_then(FieldValue::as_str)
                .map_or(false, |stored| constant_time_eq(stored, supplied))
        };
        if matches(USERNAME_FIELD, &credentials.username)
            && matches(PASSWORD_FIELD, &credentials.password)
        {
            Ok(())
        } else {
            debug!(username = %credentials.username, "credentials rejected");
            Err(AuthError::InvalidCredentials)
        }
    }
}

fn constant_time_eq(a: &str, b: &str) -> bool {
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{Fields, MemoryStore};

    fn directory() -> UserDirectory {
        let store = MemoryStore::new();
        let mut alice = Fields::new();
        alice.insert(USERNAME_FIELD.to_string(), "alice".into());
        alice.insert(PASSWORD_FIELD.to_string(), "secret".into());
        store.insert(Collection::Users, "alice", alice).unwrap();

        // Document key and stored username disagree
        let mut mallory = Fields::new();
        mallory.insert(USERNAME_FIELD.to_string(), "someone-else".into());
        mallory.insert(PASSWORD_FIELD.to_string(), "pw".into());
        store.insert(Collection::Users, "mallory", mallory).unwrap();

        let mut nopass = Fields::new();
        nopass.insert(USERNAME_FIELD.to_string(), "nopass".into());
        store.insert(Collection::Users, "nopass", nopass).unwrap();
        UserDirectory::new(Arc::new(store))
    }

    #[tokio::test]
    async fn test_correct_password() {
        let result = directory().verify(&Credentials::new("alice", "secret")).await;
        assert_eq!(result, Ok(()));
    }

    #[tokio::test]
    async fn test_wrong_password() {
        let result = directory().verify(&Credentials::new("alice", "guess")).await;
        assert_eq!(result, Err(AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_unknown_user() {
        let result = directory().verify(&Credentials::new("bob", "secret")).await;
        assert_eq!(result, Err(AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_stored_username_must_match() {
        let result = directory().verify(&Credentials::new("mallory", "pw")).await;
        assert_eq!(result, Err(AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_user_without_password_never_matches() {
        let result = directory().verify(&Credentials::new("nopass", "")).await;
        assert_eq!(result, Err(AuthError::InvalidCredentials));
    }
}
