use std::collections::HashMap;
use std::sync::Arc;

use base64::Engine;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::info;

pub type SessionToken = String;

/// An issued login session. `active` only goes false through [`SessionStore::revoke`],
/// an extension over the reference flow, which never ends a session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Session {
    pub identity_id: String,
    pub token: SessionToken,
    pub active: bool,
}

fn gen_token() -> String {
    // 128-bit random token, base64url without padding
    let mut buf = [0u8; 16];
    let _ = getrandom::getrandom(&mut buf);
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(buf)
}

/// In-memory token -> session store. No expiry; lookup is exact match.
#[derive(Clone, Default)]
pub struct SessionStore {
    inner: Arc<RwLock<HashMap<SessionToken, Session>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a fresh session for the identity. Token uniqueness is checked
    /// under the write lock so concurrent issues cannot collide.
    pub fn create(&self, identity_id: &str) -> Session {
        let mut map = self.inner.write();
        let mut token = gen_token();
        while map.contains_key(&token) {
            token = gen_token();
        }
        let session = Session {
            identity_id: identity_id.to_string(),
            token: token.clone(),
            active: true,
        };
        map.insert(token, session.clone());
        session
    }

    /// Exact-match lookup. Revoked sessions do not resolve.
    pub fn find_by_token(&self, token: &str) -> Option<Session> {
        self.inner.read().get(token).filter(|s| s.active).cloned()
    }

    /// Insert an externally supplied session, token included. Used to
    /// provision the well-known fixture token at startup.
    pub fn seed(&self, session: Session) {
        self.inner.write().insert(session.token.clone(), session);
    }

    /// Extension over the reference behavior: mark a session inactive so its
    /// token resolves to Anonymous from now on. Returns false when the token
    /// is unknown or already revoked.
    pub fn revoke(&self, token: &str) -> bool {
        let mut map = self.inner.write();
        match map.get_mut(token) {
            Some(s) if s.active => {
                s.active = false;
                info!(identity_id = %s.identity_id, "session.revoke");
                true
            }
            _ => false,
        }
    }
}
