use axum::http::HeaderMap;

use super::principal::Principal;
use super::provider::Authenticator;

/// Immutable per-request identity context, built once at request start and
/// threaded read-only through everything that answers the request.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub principal: Principal,
}

/// Pull the bearer credential out of the Authorization header. Absent header
/// is the empty string, the permanent anonymous credential. A `Bearer ` prefix
/// is stripped when present; otherwise the raw header value is the token.
pub fn bearer_token(headers: &HeaderMap) -> String {
    let raw = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    raw.strip_prefix("Bearer ").unwrap_or(raw).trim().to_string()
}

impl RequestContext {
    /// Bind the request's credential to a principal. Never fails; the worst
    /// case is an anonymous context. Never mutates store state.
    pub fn bind(auth: &Authenticator, headers: &HeaderMap) -> Self {
        Self { principal: auth.resolve_session(&bearer_token(headers)) }
    }

    pub fn anonymous() -> Self {
        Self { principal: Principal::anonymous() }
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::anonymous()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn bearer_token_handles_missing_header() {
        assert_eq!(bearer_token(&HeaderMap::new()), "");
    }

    #[test]
    fn bearer_token_strips_optional_prefix() {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", HeaderValue::from_static("Bearer abc123"));
        assert_eq!(bearer_token(&headers), "abc123");

        headers.insert("authorization", HeaderValue::from_static("abc123"));
        assert_eq!(bearer_token(&headers), "abc123");
    }

    #[test]
    fn bind_without_credential_is_anonymous() {
        let auth = Authenticator::default();
        let ctx = RequestContext::bind(&auth, &HeaderMap::new());
        assert!(ctx.principal.is_anonymous());
    }

    #[test]
    fn bind_with_issued_token_is_bound() {
        let auth = Authenticator::default();
        auth.register("alice", "pw1");
        let (_, session) = auth.login("alice", "pw1").unwrap();
        let mut headers = HeaderMap::new();
        headers.insert(
            "authorization",
            HeaderValue::from_str(&format!("Bearer {}", session.token)).unwrap(),
        );
        let ctx = RequestContext::bind(&auth, &headers);
        assert_eq!(ctx.principal.login_name, "alice");
    }
}
