use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

/// A registered account. Never mutated or deleted after creation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Identity {
    pub id: String,
    pub display_name: String,
    pub login_name: String,
    pub secret: String,
}

/// In-memory account store. Cloneable handle over shared state; appends are
/// atomic with respect to concurrent lookups.
#[derive(Clone, Default)]
pub struct IdentityStore {
    inner: Arc<RwLock<Vec<Identity>>>,
}

impl IdentityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create and store a fresh account with a generated id.
    ///
    /// Duplicate login names are permitted: the guard below only warns. Turn
    /// its result into an error here to enforce uniqueness instead.
    pub fn create(&self, login_name: &str, secret: &str, display_name: &str) -> Identity {
        if self.login_name_taken(login_name) {
            warn!(login_name, "registering duplicate login name");
        }
        let identity = Identity {
            id: Uuid::new_v4().to_string(),
            display_name: display_name.to_string(),
            login_name: login_name.to_string(),
            secret: secret.to_string(),
        };
        self.inner.write().push(identity.clone());
        identity
    }

    fn login_name_taken(&self, login_name: &str) -> bool {
        self.inner.read().iter().any(|i| i.login_name == login_name)
    }

    pub fn find_by_login_name(&self, login_name: &str) -> Option<Identity> {
        self.inner.read().iter().find(|i| i.login_name == login_name).cloned()
    }

    pub fn find_by_id(&self, id: &str) -> Option<Identity> {
        self.inner.read().iter().find(|i| i.id == id).cloned()
    }

    /// Exact match on the (login_name, secret) pair, both case-sensitive.
    /// With duplicate login names the secret disambiguates.
    pub fn find_by_credentials(&self, login_name: &str, secret: &str) -> Option<Identity> {
        self.inner
            .read()
            .iter()
            .find(|i| i.login_name == login_name && i.secret == secret)
            .cloned()
    }

    /// Insert an externally supplied account record, id included. Used to
    /// provision fixture accounts at startup.
    pub fn seed(&self, identity: Identity) {
        self.inner.write().push(identity);
    }

    pub fn all(&self) -> Vec<Identity> {
        self.inner.read().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_assigns_unique_ids() {
        let store = IdentityStore::new();
        let a = store.create("alice", "pw1", "alice");
        let b = store.create("bob", "pw2", "bob");
        assert_ne!(a.id, b.id);
        assert_eq!(store.all().len(), 2);
    }

    #[test]
    fn duplicate_login_names_create_two_accounts() {
        let store = IdentityStore::new();
        let first = store.create("alice", "pw1", "alice");
        let second = store.create("alice", "pw2", "alice");
        assert_ne!(first.id, second.id);
        assert_eq!(store.all().len(), 2);
        // Pair lookup still distinguishes them
        assert_eq!(store.find_by_credentials("alice", "pw2").map(|i| i.id), Some(second.id));
    }

    #[test]
    fn lookups_miss_cleanly() {
        let store = IdentityStore::new();
        assert!(store.find_by_login_name("nobody").is_none());
        assert!(store.find_by_id("no-such-id").is_none());
        assert!(store.find_by_credentials("nobody", "pw").is_none());
    }

    #[test]
    fn empty_credentials_are_stored_as_is() {
        let store = IdentityStore::new();
        let i = store.create("", "", "");
        assert_eq!(store.find_by_credentials("", "").map(|x| x.id), Some(i.id));
    }
}
