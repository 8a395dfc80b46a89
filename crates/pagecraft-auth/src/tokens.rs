//! Token issuance and verification.
//!
//! One [`TokenService`] is built from [`JwtConfig`] at startup and shared
//! through application state. All tokens are HS256-signed with the same
//! secret and carry a `type` claim so one kind can never stand in for another.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use uuid::Uuid;

use pagecraft_config::JwtConfig;

use crate::claims::{Claims, TokenType};
use crate::error::AuthError;
use crate::role::Role;

/// Identity embedded into a token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenSubject {
    pub email: String,
    pub user_id: Option<i64>,
    pub role: Option<Role>,
}

impl TokenSubject {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            user_id: None,
            role: None,
        }
    }

    pub fn with_user(mut self, user_id: i64, role: Role) -> Self {
        self.user_id = Some(user_id);
        self.role = Some(role);
        self
    }
}

#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    access_ttl: Duration,
    refresh_ttl: Duration,
    reset_ttl: Duration,
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .field("reset_ttl", &self.reset_ttl)
            .finish_non_exhaustive()
    }
}

impl TokenService {
    pub fn new(config: &JwtConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // expiry is checked against the caller's clock in `verify`
        validation.validate_exp = false;
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
            access_ttl: Duration::seconds(config.access_token_expiry),
            refresh_ttl: Duration::seconds(config.refresh_token_expiry),
            reset_ttl: Duration::seconds(config.reset_token_expiry),
        }
    }

    pub fn access_ttl(&self) -> Duration {
        self.access_ttl
    }

    pub fn refresh_ttl(&self) -> Duration {
        self.refresh_ttl
    }

    /// Signs an access token that expires `ttl` after `now`.
    pub fn issue_access_token(
        &self,
        subject: &TokenSubject,
        ttl: Duration,
        now: DateTime<Utc>,
    ) -> Result<String, AuthError> {
        self.sign(subject, TokenType::Access, now, ttl, None)
    }

    /// Access token with the configured lifetime.
    pub fn access_token(
        &self,
        subject: &TokenSubject,
        now: DateTime<Utc>,
    ) -> Result<String, AuthError> {
        self.issue_access_token(subject, self.access_ttl, now)
    }

    /// Signs a refresh token. `issued_at` should come from
    /// [`crate::revocation::issue_instant`].
    pub fn issue_refresh_token(
        &self,
        subject: &TokenSubject,
        issued_at: DateTime<Utc>,
    ) -> Result<String, AuthError> {
        let jti = Uuid::new_v4().to_string();
        self.sign(subject, TokenType::Refresh, issued_at, self.refresh_ttl, Some(jti))
    }

    /// Signs a password-reset token, revocable like a refresh token.
    pub fn issue_reset_token(
        &self,
        subject: &TokenSubject,
        issued_at: DateTime<Utc>,
    ) -> Result<String, AuthError> {
        let jti = Uuid::new_v4().to_string();
        self.sign(subject, TokenType::Reset, issued_at, self.reset_ttl, Some(jti))
    }

    /// Checks signature, expiry (`now >= exp` is expired) and type, in that order.
    pub fn verify(
        &self,
        token: &str,
        expected: TokenType,
        now: DateTime<Utc>,
    ) -> Result<Claims, AuthError> {
        let claims = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| {
                tracing::debug!(error = %e, "token decode failed");
                AuthError::InvalidToken
            })?
            .claims;

        if now.timestamp() >= claims.exp {
            return Err(AuthError::ExpiredToken);
        }

        if claims.token_type != expected {
            return Err(AuthError::WrongTokenType);
        }

        Ok(claims)
    }

    fn sign(
        &self,
        subject: &TokenSubject,
        token_type: TokenType,
        issued_at: DateTime<Utc>,
        ttl: Duration,
        jti: Option<String>,
    ) -> Result<String, AuthError> {
        let iat = issued_at.timestamp();
        // end of lifetime, rounded up to a whole second
        let expires_at = issued_at + ttl;
        let exp = expires_at.timestamp() + i64::from(expires_at.timestamp_subsec_nanos() > 0);
        let claims = Claims {
            sub: subject.email.clone(),
            uid: subject.user_id,
            role: subject.role,
            exp,
            iat,
            token_type,
            jti,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::TokenCreation(e.to_string()))
    }
}
