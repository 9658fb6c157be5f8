use std::fmt;

use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::errors::DashboardError;

/// Claims read from the stored access token. Issuers name the subject differently,
/// so each spelling is its own optional claim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthUser {
    #[serde(default)]
    pub sub: Option<String>,
    #[serde(default, rename = "userId")]
    pub user_id: Option<String>,
    #[serde(default, rename = "_id")]
    pub object_id: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub exp: Option<u64>,
}

impl AuthUser {
    /// First of `sub`, `userId`, `_id`, `id` that is present.
    pub fn subject(&self) -> Option<&str> {
        [&self.sub, &self.user_id, &self.object_id, &self.id]
            .into_iter()
            .find_map(|claim| claim.as_deref())
    }

    /// Key under which this user's table views are kept.
    pub fn session_key(&self) -> String {
        self.subject()
            .or(self.email.as_deref())
            .map(str::to_string)
            .unwrap_or_else(|| "anonymous".to_string())
    }
}

/// The raw access credential. Wiped from memory on drop and never printed.
#[derive(Clone, PartialEq)]
pub struct AccessToken(Zeroizing<String>);

impl AccessToken {
    pub fn new(raw: impl Into<String>) -> Self {
        AccessToken(Zeroizing::new(raw.into()))
    }

    pub fn expose(&self) -> &str {
        self.0.as_str()
    }

    /// Value for the `Authorization` header. Without a scheme the token is sent as is.
    pub fn header_value(&self, scheme: Option<&str>) -> String {
        match scheme.map(str::trim).filter(|s| !s.is_empty()) {
            Some(scheme) => format!("{} {}", scheme, self.expose()),
            None => self.expose().to_string(),
        }
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(<redacted>)")
    }
}

/// Per-request credentials handed to every data-access call.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    pub access_token: Option<AccessToken>,
}

impl RequestContext {
    pub fn anonymous() -> Self {
        RequestContext::default()
    }

    pub fn with_token(token: AccessToken) -> Self {
        RequestContext { access_token: Some(token) }
    }

    pub fn require_token(&self) -> Result<&AccessToken, DashboardError> {
        self.access_token.as_ref().ok_or(DashboardError::Unauthenticated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn session_key_prefers_subject_then_email() {
        let user: AuthUser = serde_json::from_value(json!({ "userId": "u1", "email": "a@b.c" })).unwrap();
        assert_eq!(user.session_key(), "u1");

        let user: AuthUser = serde_json::from_value(json!({ "email": "a@b.c" })).unwrap();
        assert_eq!(user.session_key(), "a@b.c");

        let user: AuthUser = serde_json::from_value(json!({})).unwrap();
        assert_eq!(user.session_key(), "anonymous");
    }

    #[test]
    fn several_subject_claims_decode_and_sub_wins() {
        let user: AuthUser =
            serde_json::from_value(json!({ "sub": "u1", "userId": "u2", "email": "a@b.c" })).unwrap();
        assert_eq!(user.session_key(), "u1");

        let user: AuthUser = serde_json::from_value(json!({ "_id": "o1", "id": "i1" })).unwrap();
        assert_eq!(user.subject(), Some("o1"));
    }

    #[test]
    fn header_value_respects_optional_scheme() {
        let token = AccessToken::new("abc");
        assert_eq!(token.header_value(None), "abc");
        assert_eq!(token.header_value(Some("Bearer")), "Bearer abc");
        assert_eq!(token.header_value(Some("  ")), "abc");
        assert_eq!(format!("{:?}", token), "AccessToken(<redacted>)");
    }

    #[test]
    fn anonymous_context_is_unauthenticated() {
        assert!(matches!(
            RequestContext::anonymous().require_token(),
            Err(DashboardError::Unauthenticated)
        ));
        let ctx = RequestContext::with_token(AccessToken::new("t"));
        assert_eq!(ctx.require_token().unwrap().expose(), "t");
    }
}
