use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use chrono::Utc;

use pagecraft_auth::{AuthError, Claims, PermissionRegistry, Role, TokenType};
use pagecraft_core::AppError;
use pagecraft_core::permissions;
use pagecraft_models::User;
use pagecraft_observability::track_authorization_check;

use crate::modules::auth::service::AuthService;
use crate::state::AppState;

/// The user behind a valid access token, loaded fresh from the database.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user: User,
    pub claims: Claims,
}

impl AuthUser {
    pub fn id(&self) -> i64 {
        self.user.id
    }

    pub fn role(&self) -> Role {
        self.user.role
    }

    pub fn email(&self) -> &str {
        &self.user.email
    }

    pub fn has_permission(&self, registry: &PermissionRegistry, permission: &str) -> bool {
        registry.has_permission(self.user.role.as_str(), permission)
    }

    /// Authorization gate: passes when the role holds any of `required`.
    pub fn require(
        &self,
        registry: &PermissionRegistry,
        required: &[&str],
    ) -> Result<(), AppError> {
        let role = self.user.role.as_str();
        let outcome = registry.authorize(role, required);
        track_authorization_check(outcome.is_ok(), role);

        outcome.map_err(|err| {
            tracing::info!(user_id = self.user.id, role, required = ?required, "permission denied");
            AppError::from(err)
        })
    }
}

fn bearer_token(parts: &Parts) -> Option<&str> {
    let value = parts.headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or(AuthError::Unauthenticated)?;

        let (user, claims) =
            AuthService::authenticate(state, token, TokenType::Access, Utc::now()).await?;

        Ok(AuthUser { user, claims })
    }
}

/// Declares an extractor that resolves the [`AuthUser`] and then requires at
/// least one of the listed permissions.
#[macro_export]
macro_rules! require_permission {
    ($name:ident, $($permission:expr),+ $(,)?) => {
        #[derive(Debug, Clone)]
        pub struct $name(pub $crate::middleware::auth::AuthUser);

        impl axum::extract::FromRequestParts<$crate::state::AppState> for $name {
            type Rejection = pagecraft_core::AppError;

            async fn from_request_parts(
                parts: &mut axum::http::request::Parts,
                state: &$crate::state::AppState,
            ) -> Result<Self, Self::Rejection> {
                let auth_user = <$crate::middleware::auth::AuthUser as axum::extract::FromRequestParts<
                    $crate::state::AppState,
                >>::from_request_parts(parts, state)
                .await?;

                auth_user.require(&state.permissions, &[$($permission),+])?;

                Ok($name(auth_user))
            }
        }
    };
}

// Users
require_permission!(RequireUsersView, permissions::USERS_VIEW);
require_permission!(RequireUsersCreate, permissions::USERS_CREATE);
require_permission!(RequireUsersEdit, permissions::USERS_EDIT);
require_permission!(RequireUsersDelete, permissions::USERS_DELETE);

// Pages, blocks and revisions
require_permission!(RequireContentView, permissions::CONTENT_VIEW);
require_permission!(RequireContentCreate, permissions::CONTENT_CREATE);
require_permission!(RequireContentEdit, permissions::CONTENT_EDIT);
require_permission!(RequireContentDelete, permissions::CONTENT_DELETE);
require_permission!(RequireContentRevise, permissions::CONTENT_REVISE);

// Media
require_permission!(RequireMediaView, permissions::MEDIA_VIEW);
require_permission!(RequireMediaUpload, permissions::MEDIA_UPLOAD);
require_permission!(RequireMediaDelete, permissions::MEDIA_DELETE);

// Site settings
require_permission!(RequireSettingsView, permissions::SITE_SETTINGS_VIEW);
require_permission!(RequireSettingsEdit, permissions::SITE_SETTINGS_EDIT);

// Audit trail
require_permission!(
    RequireAuditView,
    permissions::ANALYTICS_VIEW,
    permissions::AUDIT_VIEW
);
require_permission!(RequireAuditDelete, permissions::AUDIT_DELETE);

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;
    use chrono::TimeZone;

    fn parts_with(header_value: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/api/auth/me");
        if let Some(value) = header_value {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    fn auth_user(role: Role) -> AuthUser {
        let epoch = Utc.timestamp_opt(0, 0).unwrap();
        AuthUser {
            user: User {
                id: 7,
                email: "someone@x.com".to_string(),
                hashed_password: String::new(),
                role,
                is_active: true,
                last_token_issue: epoch,
                created_at: epoch,
                updated_at: epoch,
            },
            claims: Claims {
                sub: "someone@x.com".to_string(),
                uid: Some(7),
                role: Some(role),
                exp: 0,
                iat: 0,
                token_type: TokenType::Access,
                jti: None,
            },
        }
    }

    #[test]
    fn bearer_token_is_extracted() {
        assert_eq!(bearer_token(&parts_with(Some("Bearer abc.def"))), Some("abc.def"));
        assert_eq!(bearer_token(&parts_with(Some("bearer abc.def"))), Some("abc.def"));
    }

    #[test]
    fn other_schemes_and_empty_tokens_are_ignored() {
        assert_eq!(bearer_token(&parts_with(None)), None);
        assert_eq!(bearer_token(&parts_with(Some("Basic dXNlcjpwdw=="))), None);
        assert_eq!(bearer_token(&parts_with(Some("Bearer "))), None);
        assert_eq!(bearer_token(&parts_with(Some("abc.def"))), None);
    }

    #[test]
    fn gate_admits_editor_and_rejects_public_for_content_edit() {
        let registry = PermissionRegistry::new();

        assert!(
            auth_user(Role::Editor)
                .require(&registry, &[permissions::CONTENT_EDIT])
                .is_ok()
        );

        let err = auth_user(Role::Public)
            .require(&registry, &[permissions::CONTENT_EDIT])
            .unwrap_err();
        assert_eq!(err.status, axum::http::StatusCode::FORBIDDEN);
        assert_eq!(err.error.to_string(), "permission(s) content.edit required");
    }

    #[test]
    fn audit_view_accepts_either_permission() {
        let registry = PermissionRegistry::new();
        let editor = auth_user(Role::Editor);
        assert!(!editor.has_permission(&registry, permissions::AUDIT_VIEW));
        assert!(
            editor
                .require(
                    &registry,
                    &[permissions::ANALYTICS_VIEW, permissions::AUDIT_VIEW]
                )
                .is_ok()
        );
    }
}
