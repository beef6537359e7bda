//! User records and the credential store contract.

use parking_lot::RwLock;
use std::collections::HashMap;
use tracing::debug;

use crate::config::AuthConfig;
use crate::error::Error;
use crate::hasher::PasswordHasher;

/// A registered user. Immutable once stored.
#[derive(Clone, Debug)]
pub struct User {
    pub username: String,
    /// Opaque credential record: salt and derived key, hex-encoded.
    pub password_hash: String,
}

/// Read-mostly store mapping usernames to credential records.
///
/// Production deployments back this with a persistent key-value store; the
/// in-memory implementation below satisfies the same contract for tests and
/// single-process use.
pub trait CredentialStore: Send + Sync {
    /// Look up a user by username. Missing users are `None`, not an error.
    fn lookup(&self, username: &str) -> Option<User>;

    /// Hash the password and store a new user record.
    ///
    /// # Errors
    /// Returns [`Error::AlreadyExists`] when the username is taken (first
    /// write wins) or an error from the hasher.
    fn register(&self, username: &str, password: &str) -> Result<(), Error>;
}

/// Process-local credential store.
pub struct InMemoryCredentialStore {
    hasher: PasswordHasher,
    users: RwLock<HashMap<String, User>>,
}

impl InMemoryCredentialStore {
    #[must_use]
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            hasher: PasswordHasher::new(config),
            users: RwLock::new(HashMap::new()),
        }
    }

    /// Build a store pre-populated with `(username, password)` pairs.
    ///
    /// # Errors
    /// Returns an error on duplicate seed usernames or hasher failure.
    pub fn seeded(config: &AuthConfig, seed: &[(&str, &str)]) -> Result<Self, Error> {
        let store = Self::new(config);
        for (username, password) in seed {
            store.register(username, password)?;
        }
        Ok(store)
    }
}

impl CredentialStore for InMemoryCredentialStore {
    fn lookup(&self, username: &str) -> Option<User> {
        self.users.read().get(username).cloned()
    }

    fn register(&self, username: &str, password: &str) -> Result<(), Error> {
        // Derive outside the lock; PBKDF2 is deliberately slow.
        let password_hash = self.hasher.hash(password)?;
        let mut users = self.users.write();
        if users.contains_key(username) {
            return Err(Error::AlreadyExists(username.to_string()));
        }
        users.insert(
            username.to_string(),
            User {
                username: username.to_string(),
                password_hash,
            },
        );
        debug!("Registered user {username}");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{CredentialStore, InMemoryCredentialStore};
    use crate::config::AuthConfig;
    use crate::error::Error;

    fn test_config() -> AuthConfig {
        AuthConfig::new().with_hash_iterations(1_000)
    }

    #[test]
    fn register_then_lookup() {
        let store = InMemoryCredentialStore::new(&test_config());
        store.register("user1", "user1").unwrap();

        let user = store.lookup("user1").unwrap();
        assert_eq!(user.username, "user1");
        assert_ne!(user.password_hash, "user1");
    }

    #[test]
    fn lookup_missing_user_is_none() {
        let store = InMemoryCredentialStore::new(&test_config());
        assert!(store.lookup("ghost").is_none());
    }

    #[test]
    fn duplicate_registration_is_rejected() {
        let store = InMemoryCredentialStore::new(&test_config());
        store.register("user1", "first").unwrap();

        let err = store.register("user1", "second").unwrap_err();
        assert!(matches!(err, Error::AlreadyExists(name) if name == "user1"));
    }

    #[test]
    fn seeded_store_holds_all_users() {
        let store =
            InMemoryCredentialStore::seeded(&test_config(), &[("user1", "user1"), ("user2", "user2")])
                .unwrap();
        assert!(store.lookup("user1").is_some());
        assert!(store.lookup("user2").is_some());
    }
}
