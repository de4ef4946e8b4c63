use tracing::{info, warn};

use crate::error::{AppError, AppResult};

use super::principal::Principal;
use super::session::{Session, SessionStore};
use super::store::{Identity, IdentityStore};

/// Orchestrates the identity and session stores behind the three core
/// operations: register, login, resolve. Cloneable handle, shared by all
/// request handlers.
#[derive(Clone, Default)]
pub struct Authenticator {
    pub identities: IdentityStore,
    pub sessions: SessionStore,
}

impl Authenticator {
    pub fn new(identities: IdentityStore, sessions: SessionStore) -> Self {
        Self { identities, sessions }
    }

    /// Create an account. Always succeeds; no session is issued (logging in
    /// is a separate step by design).
    pub fn register(&self, login_name: &str, secret: &str) -> Identity {
        let identity = self.identities.create(login_name, secret, login_name);
        info!(user = %identity.login_name, id = %identity.id, "auth.register");
        identity
    }

    /// Authenticate against the exact (login_name, secret) pair and issue a
    /// new session. Each login issues an independent, co-valid session. On a
    /// miss nothing is stored.
    pub fn login(&self, login_name: &str, secret: &str) -> AppResult<(Identity, Session)> {
        let Some(identity) = self.identities.find_by_credentials(login_name, secret) else {
            warn!(user = %login_name, "auth.login rejected");
            return Err(AppError::auth("invalid_credentials", "login failed"));
        };
        let session = self.sessions.create(&identity.id);
        info!(user = %identity.login_name, id = %identity.id, "auth.login");
        Ok((identity, session))
    }

    /// Resolve a credential to a principal. Total: empty, unknown, or revoked
    /// tokens resolve to Anonymous, never an error. A session whose identity
    /// is missing from the store fails closed to Anonymous as well.
    pub fn resolve_session(&self, token: &str) -> Principal {
        if token.is_empty() {
            return Principal::anonymous();
        }
        let Some(session) = self.sessions.find_by_token(token) else {
            return Principal::anonymous();
        };
        match self.identities.find_by_id(&session.identity_id) {
            Some(identity) => {
                info!(user = %identity.login_name, "auth.resolve");
                Principal::from(identity)
            }
            None => {
                warn!(identity_id = %session.identity_id, "auth.resolve dangling identity");
                Principal::anonymous()
            }
        }
    }

    /// Extension over the reference behavior: revoke the presented token.
    pub fn logout(&self, token: &str) -> bool {
        self.sessions.revoke(token)
    }
}
