use axum::{Form, Json, extract::State, http::StatusCode};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use chrono::Utc;
use tracing::instrument;
use utoipa::ToSchema;

use pagecraft_auth::AuthError;
use pagecraft_core::AppError;
use pagecraft_models::{
    LoginForm, MeResponse, MessageResponse, PasswordResetConfirm, PasswordResetRequest,
    PasswordResetTokenResponse, RegisterRequest, TokenResponse, UserResponse,
};

use crate::middleware::auth::AuthUser;
use crate::modules::auth::service::AuthService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

pub const REFRESH_COOKIE: &str = "refresh_token";
const REFRESH_COOKIE_PATH: &str = "/api/auth";

#[derive(ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

fn refresh_cookie(state: &AppState, token: String) -> Cookie<'static> {
    Cookie::build((REFRESH_COOKIE, token))
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(state.jwt_config.cookie_secure)
        .path(REFRESH_COOKIE_PATH)
        .max_age(time::Duration::seconds(state.tokens.refresh_ttl().num_seconds()))
        .build()
}

fn expired_refresh_cookie(state: &AppState) -> Cookie<'static> {
    Cookie::build((REFRESH_COOKIE, ""))
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(state.jwt_config.cookie_secure)
        .path(REFRESH_COOKIE_PATH)
        .max_age(time::Duration::ZERO)
        .build()
}

/// Register a new account
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered", body = UserResponse),
        (status = 400, description = "Email already registered", body = ErrorResponse),
        (status = 403, description = "Requested role other than public", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, dto))]
pub async fn register_user(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<RegisterRequest>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    let user = AuthService::register(&state, dto).await?;
    Ok((StatusCode::CREATED, Json(user.into())))
}

/// Exchange credentials for an access token and a refresh cookie
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body(content = LoginForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Login successful; sets the refresh_token cookie", body = TokenResponse),
        (status = 400, description = "Incorrect email or password", body = ErrorResponse),
        (status = 403, description = "Inactive user", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, jar, form), fields(email = %form.username))]
pub async fn login_user(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Result<(CookieJar, Json<TokenResponse>), AppError> {
    let tokens = AuthService::login(&state, &form.username, &form.password, Utc::now()).await?;

    let jar = jar.add(refresh_cookie(&state, tokens.refresh_token));
    Ok((jar, Json(TokenResponse::bearer(tokens.access_token))))
}

/// Mint a new access token from the refresh cookie
#[utoipa::path(
    post,
    path = "/api/auth/refresh",
    responses(
        (status = 200, description = "New access token", body = TokenResponse),
        (status = 401, description = "Missing, invalid, expired or revoked refresh token", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, jar))]
pub async fn refresh_token(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<Json<TokenResponse>, AppError> {
    let cookie = jar.get(REFRESH_COOKIE).ok_or(AuthError::Unauthenticated)?;
    let access_token = AuthService::refresh(&state, cookie.value(), Utc::now()).await?;
    Ok(Json(TokenResponse::bearer(access_token)))
}

/// Revoke refresh tokens and clear the cookie
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    responses(
        (status = 200, description = "Logged out", body = MessageResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    tag = "Authentication",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user, jar), fields(user_id = auth_user.id()))]
pub async fn logout_user(
    State(state): State<AppState>,
    auth_user: AuthUser,
    jar: CookieJar,
) -> Result<(CookieJar, Json<MessageResponse>), AppError> {
    AuthService::logout(&state, &auth_user.user, Utc::now()).await?;

    let jar = jar.add(expired_refresh_cookie(&state));
    Ok((jar, Json(MessageResponse::new("Logout successful"))))
}

/// Issue a password reset token
///
/// The token is returned directly instead of being e-mailed.
#[utoipa::path(
    post,
    path = "/api/auth/reset-password/request",
    request_body = PasswordResetRequest,
    responses(
        (status = 200, description = "Reset token issued", body = PasswordResetTokenResponse),
        (status = 403, description = "Inactive user", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, dto))]
pub async fn request_password_reset(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<PasswordResetRequest>,
) -> Result<Json<PasswordResetTokenResponse>, AppError> {
    let reset_token = AuthService::request_password_reset(&state, &dto.email, Utc::now()).await?;

    Ok(Json(PasswordResetTokenResponse {
        message: "Password reset token generated".to_string(),
        reset_token,
    }))
}

#[utoipa::path(
    post,
    path = "/api/auth/reset-password/confirm",
    request_body = PasswordResetConfirm,
    responses(
        (status = 200, description = "Password changed", body = MessageResponse),
        (status = 401, description = "Invalid, expired or already used token", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, dto))]
pub async fn confirm_password_reset(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<PasswordResetConfirm>,
) -> Result<Json<MessageResponse>, AppError> {
    AuthService::confirm_password_reset(&state, &dto.token, &dto.new_password, Utc::now()).await?;
    Ok(Json(MessageResponse::new("Password reset successful")))
}

/// Current user and the permissions their role grants
#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "Current user", body = MeResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    tag = "Authentication",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user), fields(user_id = auth_user.id()))]
pub async fn get_me(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Json<MeResponse> {
    Json(AuthService::me(&state, auth_user.user))
}
