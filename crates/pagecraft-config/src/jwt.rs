use crate::env::{ConfigError, flag, parse_or, required};

/// Token signing and lifetime settings. Lifetimes are in seconds.
#[derive(Clone, Debug)]
pub struct JwtConfig {
    pub secret: String,
    pub access_token_expiry: i64,
    pub refresh_token_expiry: i64,
    pub reset_token_expiry: i64,
    /// Adds `Secure` to the refresh cookie; enable behind HTTPS.
    pub cookie_secure: bool,
}

impl JwtConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            secret: required("JWT_SECRET")?,
            access_token_expiry: parse_or("JWT_ACCESS_EXPIRY", 900), // 15 minutes
            refresh_token_expiry: parse_or("JWT_REFRESH_EXPIRY", 604_800), // 7 days
            reset_token_expiry: parse_or("JWT_RESET_EXPIRY", 1800), // 30 minutes
            cookie_secure: flag("COOKIE_SECURE", false)?,
        })
    }

    /// Fixed configuration for tests.
    pub fn for_testing() -> Self {
        Self {
            secret: "test-secret-key-for-testing-only".to_string(),
            access_token_expiry: 900,
            refresh_token_expiry: 604_800,
            reset_token_expiry: 1800,
            cookie_secure: false,
        }
    }
}
