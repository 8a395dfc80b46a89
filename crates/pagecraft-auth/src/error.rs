use axum::http::StatusCode;
use pagecraft_core::AppError;
use thiserror::Error;

/// Authentication and authorization failures.
///
/// Every token problem reaches the client as the same 401 message; the
/// variant is only visible in logs.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("incorrect email or password")]
    InvalidCredentials,

    #[error("account is inactive")]
    InactiveAccount,

    #[error("token is malformed or has a bad signature")]
    InvalidToken,

    #[error("token has expired")]
    ExpiredToken,

    #[error("token has the wrong type")]
    WrongTokenType,

    #[error("token was issued before the last revocation")]
    RevokedToken,

    #[error("token subject does not exist")]
    UserNotFound,

    #[error("token subject is inactive")]
    InactiveUser,

    #[error("no credentials were presented")]
    Unauthenticated,

    #[error("permission(s) {} required", .required.join(", "))]
    Forbidden { required: Vec<String> },

    #[error("failed to sign token: {0}")]
    TokenCreation(String),
}

impl AuthError {
    /// True for failures that are reported to the client as a bare 401.
    pub fn is_credential_failure(&self) -> bool {
        matches!(
            self,
            AuthError::InvalidToken
                | AuthError::ExpiredToken
                | AuthError::WrongTokenType
                | AuthError::RevokedToken
                | AuthError::UserNotFound
                | AuthError::InactiveUser
        )
    }

    /// Short label for metrics and structured logs.
    pub fn reason(&self) -> &'static str {
        match self {
            AuthError::InvalidCredentials => "invalid_credentials",
            AuthError::InactiveAccount => "inactive_account",
            AuthError::InvalidToken => "invalid_token",
            AuthError::ExpiredToken => "expired_token",
            AuthError::WrongTokenType => "wrong_token_type",
            AuthError::RevokedToken => "revoked_token",
            AuthError::UserNotFound => "user_not_found",
            AuthError::InactiveUser => "inactive_user",
            AuthError::Unauthenticated => "unauthenticated",
            AuthError::Forbidden { .. } => "forbidden",
            AuthError::TokenCreation(_) => "token_creation",
        }
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => {
                AppError::bad_request(anyhow::anyhow!("Incorrect email or password"))
            }
            AuthError::InactiveAccount => AppError::forbidden("Inactive user".to_string()),
            AuthError::Unauthenticated => AppError::unauthorized("Not authenticated".to_string()),
            AuthError::Forbidden { .. } => AppError::forbidden(err.to_string()),
            AuthError::TokenCreation(_) => {
                AppError::new(StatusCode::INTERNAL_SERVER_ERROR, err)
            }
            _ => {
                tracing::warn!(reason = err.reason(), "token rejected: {err}");
                AppError::unauthorized("Could not validate credentials".to_string())
            }
        }
    }
}
