use serde::{Deserialize, Serialize};

use super::store::Identity;

/// Login name of the distinguished anonymous principal. Every request that
/// carries no usable credential resolves to it.
pub const ANONYMOUS_LOGIN: &str = "anonymous";

/// Identity a request resolved to: either a bound account or Anonymous.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Principal {
    pub id: String,
    pub login_name: String,
    pub display_name: String,
}

impl Principal {
    pub fn anonymous() -> Self {
        Self {
            id: String::new(),
            login_name: ANONYMOUS_LOGIN.to_string(),
            display_name: "Anonymous user".to_string(),
        }
    }

    pub fn is_anonymous(&self) -> bool {
        self.login_name == ANONYMOUS_LOGIN
    }
}

impl From<Identity> for Principal {
    fn from(identity: Identity) -> Self {
        Self {
            id: identity.id,
            login_name: identity.login_name,
            display_name: identity.display_name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anonymous_is_anonymous() {
        assert!(Principal::anonymous().is_anonymous());
    }

    #[test]
    fn bound_identity_is_not_anonymous() {
        let p = Principal::from(Identity {
            id: "abc".into(),
            display_name: "Alice".into(),
            login_name: "alice".into(),
            secret: "pw1".into(),
        });
        assert!(!p.is_anonymous());
        assert_eq!(p.login_name, "alice");
    }
}
