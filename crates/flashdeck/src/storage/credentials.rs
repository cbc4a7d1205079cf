//! Username/password records.
//!
//! Passwords are stored and compared in plaintext.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use super::{bootstrap_json, read_json, write_json};
use crate::error::{Error, Result};

/// Message returned by a successful signup.
pub const SIGNUP_OK: &str = "Signup successful. Please login.";

/// Message returned by a successful login.
pub const LOGIN_OK: &str = "Login successful";

type UserMap = BTreeMap<String, String>;

/// File-backed credential store.
///
/// Every operation re-reads the file, so edits made by another process
/// between calls are picked up. Mutations rewrite the whole mapping.
#[derive(Debug)]
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    /// Open the store at `path`, creating an empty mapping if the file is
    /// absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the file or its directory cannot be created.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if bootstrap_json(&path, &UserMap::new())? {
            info!("Created credential store at {}", path.display());
        }
        debug!("Credential store opened at {}", path.display());
        Ok(Self { path })
    }

    /// Get the path to the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Register a new user.
    ///
    /// The username is trimmed; the password is stored exactly as given.
    ///
    /// # Errors
    ///
    /// - [`Error::Validation`] if either field is blank
    /// - [`Error::DuplicateUser`] if the username is taken
    /// - [`Error::StorageWrite`] if the mapping cannot be saved
    pub fn signup(&self, username: &str, password: &str) -> Result<&'static str> {
        let username = username.trim();
        if username.is_empty() || password.trim().is_empty() {
            return Err(Error::validation("Username and password required"));
        }

        let mut users = self.load();
        if users.contains_key(username) {
            return Err(Error::DuplicateUser {
                username: username.to_string(),
            });
        }

        users.insert(username.to_string(), password.to_string());
        write_json(&self.path, &users)?;

        info!("Registered user {}", username);
        Ok(SIGNUP_OK)
    }

    /// Check a username/password pair.
    ///
    /// # Errors
    ///
    /// - [`Error::UserNotFound`] if the username has no account
    /// - [`Error::InvalidCredentials`] if the password doesn't match
    pub fn login(&self, username: &str, password: &str) -> Result<&'static str> {
        let username = username.trim();
        let users = self.load();

        match users.get(username) {
            None => Err(Error::UserNotFound {
                username: username.to_string(),
            }),
            Some(stored) if stored != password => Err(Error::InvalidCredentials {
                username: username.to_string(),
            }),
            Some(_) => {
                debug!("User {} logged in", username);
                Ok(LOGIN_OK)
            }
        }
    }

    /// Number of registered users.
    #[must_use]
    pub fn user_count(&self) -> usize {
        self.load().len()
    }

    /// Read the mapping, treating a missing or corrupt file as empty.
    fn load(&self) -> UserMap {
        match read_json(&self.path) {
            Ok(users) => users,
            Err(e) => {
                warn!("{e}; treating credential store as empty");
                UserMap::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    fn create_test_store() -> (tempfile::TempDir, CredentialStore) {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let store = CredentialStore::open(dir.path().join("users.json")).unwrap();
        (dir, store)
    }

    #[test]
    fn test_open_creates_empty_file() {
        let (_dir, store) = create_test_store();

        let raw = fs::read_to_string(store.path()).unwrap();
        assert_eq!(raw.trim(), "{}");
        assert_eq!(store.user_count(), 0);
    }

    #[test]
    fn test_signup_then_login() {
        let (_dir, store) = create_test_store();

        assert_eq!(store.signup("alice", "pw1").unwrap(), SIGNUP_OK);
        assert_eq!(store.login("alice", "pw1").unwrap(), LOGIN_OK);

        let err = store.login("alice", "wrong").unwrap_err();
        assert!(matches!(err, Error::InvalidCredentials { .. }));
    }

    #[test]
    fn test_signup_duplicate_keeps_first_password() {
        let (_dir, store) = create_test_store();

        store.signup("alice", "first").unwrap();
        let err = store.signup("alice", "second").unwrap_err();
        assert!(matches!(err, Error::DuplicateUser { .. }));

        assert!(store.login("alice", "first").is_ok());
        assert!(store.login("alice", "second").is_err());
        assert_eq!(store.user_count(), 1);
    }

    #[test]
    fn test_signup_rejects_blank_fields() {
        let (_dir, store) = create_test_store();

        for (user, pass) in [("", "pw"), ("   ", "pw"), ("bob", ""), ("bob", "  ")] {
            let err = store.signup(user, pass).unwrap_err();
            assert!(matches!(err, Error::Validation { .. }));
        }
        assert_eq!(store.user_count(), 0);
    }

    #[test]
    fn test_username_is_trimmed() {
        let (_dir, store) = create_test_store();

        store.signup("  carol ", "pw").unwrap();
        assert_eq!(store.user_count(), 1);
        assert!(store.login("carol", "pw").is_ok());
        assert!(matches!(
            store.signup("carol", "other"),
            Err(Error::DuplicateUser { .. })
        ));
    }

    #[test]
    fn test_password_is_exact() {
        let (_dir, store) = create_test_store();

        store.signup("dave", " secret ").unwrap();
        assert!(store.login("dave", " secret ").is_ok());
        assert!(store.login("dave", "secret").is_err());
    }

    #[test]
    fn test_login_unknown_user() {
        let (_dir, store) = create_test_store();

        let err = store.login("nobody", "pw").unwrap_err();
        assert!(matches!(err, Error::UserNotFound { .. }));
    }

    #[test]
    fn test_corrupt_file_reads_as_empty() {
        let (_dir, store) = create_test_store();
        fs::write(store.path(), "not json at all").unwrap();

        assert_eq!(store.user_count(), 0);
        assert!(matches!(
            store.login("alice", "pw"),
            Err(Error::UserNotFound { .. })
        ));

        // Next signup overwrites the corrupt file with a valid mapping
        store.signup("alice", "pw").unwrap();
        assert!(store.login("alice", "pw").is_ok());
    }

    #[test]
    fn test_persisted_format_is_plain_mapping() {
        let (_dir, store) = create_test_store();
        store.signup("alice", "pw1").unwrap();

        let raw = fs::read_to_string(store.path()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value, serde_json::json!({ "alice": "pw1" }));
    }

    #[test]
    fn test_picks_up_external_edits() {
        let (_dir, store) = create_test_store();
        fs::write(store.path(), r#"{"erin": "pw"}"#).unwrap();

        assert!(store.login("erin", "pw").is_ok());
    }
}
