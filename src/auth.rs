//! Demo accounts: registration, sign-in and the single active session.
//!
//! Passwords are stored as SHA-256 hex digests. Hashes written by the old
//! reversible fallback (plain base64 of the password) are still accepted at
//! sign-in.

use std::sync::Arc;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use chrono::Utc;
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::models::{Session, User, Users};
use crate::storage::{StorageError, StorageKey, Store, StoreExt};

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AuthError {
    #[error("enter both a username and a password")]
    MissingFields,
    #[error("that username already exists, choose another")]
    UsernameTaken,
    /// Unknown user and wrong password look the same to the caller.
    #[error("invalid username or password")]
    InvalidCredentials,
    #[error(transparent)]
    Storage(#[from] StorageError),
}

pub fn hash_password(password: &str) -> String {
    Sha256::digest(password.as_bytes())
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}

fn legacy_hash(password: &str) -> String {
    STANDARD.encode(password.as_bytes())
}

fn is_sha256_hex(stored: &str) -> bool {
    stored.len() == 64 && stored.bytes().all(|b| b.is_ascii_hexdigit())
}

/// Digests only ever match the SHA-256 form; anything else is a legacy hash.
fn verify_password(password: &str, stored: &str) -> bool {
    if is_sha256_hex(stored) {
        hash_password(password) == stored
    } else {
        legacy_hash(password) == stored
    }
}

pub struct Auth {
    store: Arc<dyn Store>,
}

impl Auth {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub fn register(&self, username: &str, password: &str) -> Result<(), AuthError> {
        let username = username.trim();
        if username.is_empty() || password.is_empty() {
            return Err(AuthError::MissingFields);
        }

        let mut users: Users = self.store.load_or_default(&StorageKey::Users)?;
        if users.contains_key(username) {
            return Err(AuthError::UsernameTaken);
        }

        users.insert(
            username.to_string(),
            User {
                password_hash: hash_password(password),
            },
        );
        self.store.save(&StorageKey::Users, &users)?;
        log::info!("registered user {username}");
        Ok(())
    }

    /// Check credentials and make `username` the active session, replacing
    /// any previous one.
    pub fn sign_in(&self, username: &str, password: &str) -> Result<Session, AuthError> {
        let username = username.trim();
        if username.is_empty() || password.is_empty() {
            return Err(AuthError::MissingFields);
        }

        let users: Users = self.store.load_or_default(&StorageKey::Users)?;
        let Some(user) = users.get(username) else {
            log::debug!("sign-in for unknown user {username}");
            return Err(AuthError::InvalidCredentials);
        };
        if !verify_password(password, &user.password_hash) {
            log::debug!("sign-in with wrong password for {username}");
            return Err(AuthError::InvalidCredentials);
        }

        let session = Session {
            username: username.to_string(),
            logged_at: Utc::now().timestamp_millis(),
        };
        self.store.save(&StorageKey::Session, &session)?;
        log::info!("{username} signed in");
        Ok(session)
    }

    pub fn sign_out(&self) -> Result<(), AuthError> {
        self.store.delete(&StorageKey::Session)?;
        log::info!("signed out");
        Ok(())
    }

    pub fn current(&self) -> Result<Option<Session>, AuthError> {
        Ok(self.store.load(&StorageKey::Session)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn auth() -> Auth {
        Auth::new(Arc::new(MemoryStore::new()))
    }

    #[test]
    fn test_hash_is_sha256_hex() {
        assert_eq!(
            hash_password("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_register_and_sign_in() {
        let auth = auth();
        auth.register("  kimi ", "secret").unwrap();
        let session = auth.sign_in("kimi", "secret").unwrap();
        assert_eq!(session.username, "kimi");
        assert_eq!(auth.current().unwrap(), Some(session));
    }

    #[test]
    fn test_duplicate_and_missing_fields() {
        let auth = auth();
        auth.register("nico", "pw").unwrap();
        assert!(matches!(auth.register("nico", "other"), Err(AuthError::UsernameTaken)));
        assert!(matches!(auth.register("", "pw"), Err(AuthError::MissingFields)));
        assert!(matches!(auth.register("x", ""), Err(AuthError::MissingFields)));
    }

    #[test]
    fn test_failures_do_not_reveal_which_part_was_wrong() {
        let auth = auth();
        auth.register("nico", "pw").unwrap();
        let unknown = auth.sign_in("ghost", "pw").unwrap_err();
        let wrong = auth.sign_in("nico", "nope").unwrap_err();
        assert_eq!(unknown.to_string(), wrong.to_string());
        assert!(auth.current().unwrap().is_none());
    }

    #[test]
    fn test_legacy_base64_hash_still_verifies() {
        let store = Arc::new(MemoryStore::new());
        let mut users = Users::new();
        users.insert(
            "old".into(),
            User {
                password_hash: "aHVudA==".into(),
            },
        );
        store.save(&StorageKey::Users, &users).unwrap();

        let auth = Auth::new(store);
        assert!(auth.sign_in("old", "hunt").is_ok());
        assert!(auth.sign_in("old", "hunter").is_err());
    }

    #[test]
    fn test_digest_never_matches_through_the_legacy_form() {
        // "kM4" encodes to "a000", which is also valid hex.
        let password = "kM4".repeat(16);
        let stored = "a000".repeat(16);
        assert_eq!(legacy_hash(&password), stored);
        assert!(!verify_password(&password, &stored));
    }

    #[test]
    fn test_sha256_hex_detection() {
        assert!(is_sha256_hex(&hash_password("x")));
        assert!(!is_sha256_hex("aHVudA=="));
        assert!(!is_sha256_hex(&"g".repeat(64)));
    }

    #[test]
    fn test_single_session() {
        let auth = auth();
        auth.register("a", "1").unwrap();
        auth.register("b", "2").unwrap();
        auth.sign_in("a", "1").unwrap();
        auth.sign_in("b", "2").unwrap();
        assert_eq!(auth.current().unwrap().map(|s| s.username), Some("b".into()));
        auth.sign_out().unwrap();
        assert!(auth.current().unwrap().is_none());
    }
}
