use chrono::{DateTime, Utc};
use tracing::instrument;

use pagecraft_auth::{AuthError, Claims, Role, TokenSubject, TokenType, revocation};
use pagecraft_core::{AppError, hash_password, verify_password};
use pagecraft_models::{MeResponse, RegisterRequest, User};
use pagecraft_observability::{
    track_login_failure, track_login_success, track_token_issued, track_token_rejected,
};

use crate::modules::audit_logs::{AuditService, action, resource};
use crate::modules::users::service::{NewUser, UserService};
use crate::state::AppState;

/// Tokens handed out by a successful login.
#[derive(Debug)]
pub struct LoginTokens {
    pub access_token: String,
    pub refresh_token: String,
}

fn subject_for(user: &User) -> TokenSubject {
    TokenSubject::new(&user.email).with_user(user.id, user.role)
}

fn reject(err: AuthError) -> AppError {
    track_token_rejected(err.reason());
    AppError::from(err)
}

pub struct AuthService;

impl AuthService {
    /// Self-registration always creates a `public` account; other roles
    /// are assigned through the user management endpoints.
    #[instrument(skip(state, dto), fields(email = %dto.email))]
    pub async fn register(state: &AppState, dto: RegisterRequest) -> Result<User, AppError> {
        let role = dto.role.unwrap_or_default();
        if role != Role::Public {
            return Err(AppError::forbidden(format!(
                "Registration cannot assign the {role} role"
            )));
        }

        let hashed = hash_password(&dto.password)?;

        let mut tx = state.db.begin().await?;
        let user = UserService::insert(
            &mut *tx,
            NewUser {
                email: &dto.email,
                hashed_password: &hashed,
                role,
                is_active: true,
            },
        )
        .await?;
        AuditService::record(&mut *tx, user.id, action::REGISTER, resource::USER, user.id).await?;
        tx.commit().await?;

        tracing::info!(user_id = user.id, role = %user.role, "user registered");
        Ok(user)
    }

    /// Checks credentials and issues an access and a refresh token. The
    /// refresh token's issue instant becomes the user's `last_token_issue`.
    #[instrument(skip(state, password))]
    pub async fn login(
        state: &AppState,
        email: &str,
        password: &str,
        now: DateTime<Utc>,
    ) -> Result<LoginTokens, AppError> {
        let Some(user) = UserService::find_by_email(&state.db, email).await? else {
            track_login_failure("unknown_email");
            return Err(AuthError::InvalidCredentials.into());
        };

        if !verify_password(password, &user.hashed_password)? {
            track_login_failure("wrong_password");
            return Err(AuthError::InvalidCredentials.into());
        }

        if !user.is_active {
            track_login_failure("inactive");
            return Err(AuthError::InactiveAccount.into());
        }

        let mut tx = state.db.begin().await?;
        let user = UserService::lock_by_id(&mut *tx, user.id).await?;

        let issued_at = revocation::issue_instant(now, user.last_token_issue);
        let subject = subject_for(&user);
        let access_token = state.tokens.access_token(&subject, now)?;
        let refresh_token = state.tokens.issue_refresh_token(&subject, issued_at)?;

        UserService::set_last_token_issue(&mut *tx, user.id, issued_at).await?;
        AuditService::record(&mut *tx, user.id, action::LOGIN, resource::USER, user.id).await?;
        tx.commit().await?;

        track_login_success(user.role.as_str());
        track_token_issued(TokenType::Access.as_str());
        track_token_issued(TokenType::Refresh.as_str());
        tracing::info!(user_id = user.id, "login succeeded");

        Ok(LoginTokens {
            access_token,
            refresh_token,
        })
    }

    /// Token verifier: signature, expiry and type, then the subject must be
    /// the same active user the token was issued to and revocable tokens
    /// must postdate `last_token_issue`.
    pub async fn authenticate(
        state: &AppState,
        token: &str,
        expected: TokenType,
        now: DateTime<Utc>,
    ) -> Result<(User, Claims), AppError> {
        let claims = state
            .tokens
            .verify(token, expected, now)
            .map_err(reject)?;

        let user = UserService::find_by_email(&state.db, &claims.sub)
            .await?
            .ok_or(AuthError::UserNotFound)
            .map_err(reject)?;

        // a recycled email belongs to a different row
        if claims.uid != Some(user.id) {
            return Err(reject(AuthError::UserNotFound));
        }

        if !user.is_active {
            return Err(reject(AuthError::InactiveUser));
        }

        if expected.is_revocable() && revocation::is_revoked(claims.iat, user.last_token_issue) {
            return Err(reject(AuthError::RevokedToken));
        }

        Ok((user, claims))
    }

    /// New access token for a valid refresh token. The refresh token itself
    /// is left as is.
    #[instrument(skip(state, refresh_token))]
    pub async fn refresh(
        state: &AppState,
        refresh_token: &str,
        now: DateTime<Utc>,
    ) -> Result<String, AppError> {
        let (user, _) = Self::authenticate(state, refresh_token, TokenType::Refresh, now).await?;
        let access_token = state.tokens.access_token(&subject_for(&user), now)?;
        track_token_issued(TokenType::Access.as_str());
        Ok(access_token)
    }

    #[instrument(skip(state, user), fields(user_id = user.id))]
    pub async fn logout(state: &AppState, user: &User, now: DateTime<Utc>) -> Result<(), AppError> {
        let mut tx = state.db.begin().await?;
        let locked = UserService::lock_by_id(&mut *tx, user.id).await?;
        UserService::revoke_tokens(&mut *tx, &locked, now).await?;
        AuditService::record(&mut *tx, user.id, action::LOGOUT, resource::USER, user.id).await?;
        tx.commit().await?;
        Ok(())
    }

    /// Issues a reset token for `email`. Unknown addresses are a 404.
    #[instrument(skip(state))]
    pub async fn request_password_reset(
        state: &AppState,
        email: &str,
        now: DateTime<Utc>,
    ) -> Result<String, AppError> {
        let user = UserService::find_by_email(&state.db, email)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("User not found")))?;

        if !user.is_active {
            return Err(AuthError::InactiveAccount.into());
        }

        let issued_at = revocation::issue_instant(now, user.last_token_issue);
        let token = state.tokens.issue_reset_token(&subject_for(&user), issued_at)?;

        let mut tx = state.db.begin().await?;
        AuditService::record(
            &mut *tx,
            user.id,
            action::PASSWORD_RESET_REQUEST,
            resource::USER,
            user.id,
        )
        .await?;
        tx.commit().await?;

        track_token_issued(TokenType::Reset.as_str());
        Ok(token)
    }

    /// Sets a new password and revokes every refresh and reset token,
    /// including the one presented.
    #[instrument(skip_all)]
    pub async fn confirm_password_reset(
        state: &AppState,
        token: &str,
        new_password: &str,
        now: DateTime<Utc>,
    ) -> Result<(), AppError> {
        let (user, _) = Self::authenticate(state, token, TokenType::Reset, now).await?;
        let hashed = hash_password(new_password)?;

        let mut tx = state.db.begin().await?;
        let locked = UserService::lock_by_id(&mut *tx, user.id).await?;
        let revoked_at = revocation::revocation_instant(now, locked.last_token_issue);

        sqlx::query(
            "UPDATE users
             SET hashed_password = $2, last_token_issue = $3, updated_at = NOW()
             WHERE id = $1",
        )
        .bind(user.id)
        .bind(&hashed)
        .bind(revoked_at)
        .execute(&mut *tx)
        .await?;

        AuditService::record(
            &mut *tx,
            user.id,
            action::PASSWORD_RESET_CONFIRM,
            resource::USER,
            user.id,
        )
        .await?;
        tx.commit().await?;

        tracing::info!(user_id = user.id, "password reset");
        Ok(())
    }

    pub fn me(state: &AppState, user: User) -> MeResponse {
        let permissions = state.permissions.describe(user.role.as_str());
        MeResponse {
            id: user.id,
            email: user.email,
            role: user.role,
            is_active: user.is_active,
            created_at: user.created_at,
            updated_at: user.updated_at,
            permissions,
        }
    }
}
