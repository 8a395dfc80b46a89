//! JWT claims shared by access, refresh and password-reset tokens.

use serde::{Deserialize, Serialize};

use crate::role::Role;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
    Reset,
}

impl TokenType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenType::Access => "access",
            TokenType::Refresh => "refresh",
            TokenType::Reset => "reset",
        }
    }

    /// Refresh and reset tokens are long-lived enough to need the
    /// `last_token_issue` revocation check; access tokens just expire.
    pub fn is_revocable(&self) -> bool {
        matches!(self, TokenType::Refresh | TokenType::Reset)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user's email address.
    pub sub: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    /// Expiry, seconds since the Unix epoch.
    pub exp: i64,
    /// Issued-at, seconds since the Unix epoch.
    pub iat: i64,
    #[serde(rename = "type")]
    pub token_type: TokenType,
    /// Unique id so two refresh tokens issued in the same second differ.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,
}

impl Claims {
    /// Role name for registry lookups; a token without a role maps to the
    /// empty string and therefore to no permissions.
    pub fn role_name(&self) -> &str {
        self.role.map(|r| r.as_str()).unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_claim_is_serialized_as_type() {
        let claims = Claims {
            sub: "a@x.com".into(),
            uid: Some(7),
            role: Some(Role::Editor),
            exp: 20,
            iat: 10,
            token_type: TokenType::Refresh,
            jti: None,
        };
        let json = serde_json::to_value(&claims).unwrap();
        assert_eq!(json["type"], "refresh");
        assert_eq!(json["role"], "editor");
        assert!(json.get("jti").is_none());
    }

    #[test]
    fn optional_claims_may_be_absent() {
        let claims: Claims =
            serde_json::from_str(r#"{"sub":"a@x.com","exp":2,"iat":1,"type":"access"}"#).unwrap();
        assert_eq!(claims.uid, None);
        assert_eq!(claims.role_name(), "");
    }

    #[test]
    fn only_refresh_and_reset_are_revocable() {
        assert!(!TokenType::Access.is_revocable());
        assert!(TokenType::Refresh.is_revocable());
        assert!(TokenType::Reset.is_revocable());
    }
}
