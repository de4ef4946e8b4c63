//! Identity and session management for marquee.
//! Keep the public surface thin and split implementation across sub-modules.

mod principal;
mod provider;
mod request_context;
mod session;
mod store;

pub use principal::{Principal, ANONYMOUS_LOGIN};
pub use provider::Authenticator;
pub use request_context::{bearer_token, RequestContext};
pub use session::{Session, SessionStore, SessionToken};
pub use store::{Identity, IdentityStore};
