use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use pagecraft_core::{PaginationMeta, PaginationParams};
use pagecraft_models::{
    AuditLog, CreatePageBlockDto, CreatePageDto, CreateRevisionDto, CreateSettingDto,
    CreateUserDto, LoginForm, Media, MeResponse, MessageResponse, Page, PageBlock, PageRevision,
    PageWithBlocks, PaginatedAuditLogsResponse, PaginatedMediaResponse,
    PaginatedPageBlocksResponse, PaginatedPagesResponse, PaginatedUsersResponse,
    PasswordResetConfirm, PasswordResetRequest, PasswordResetTokenResponse, RegisterRequest,
    RevisionStatus, Role, SiteSetting, TokenResponse, UpdatePageBlockDto, UpdatePageDto,
    UpdateSettingDto, UpdateUserDto, UserResponse,
};

use crate::health::HealthResponse;
use crate::modules::auth::controller::ErrorResponse;
use crate::modules::media::controller::MediaUploadForm;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::health::root,
        crate::health::health_check,
        crate::modules::auth::controller::register_user,
        crate::modules::auth::controller::login_user,
        crate::modules::auth::controller::refresh_token,
        crate::modules::auth::controller::logout_user,
        crate::modules::auth::controller::request_password_reset,
        crate::modules::auth::controller::confirm_password_reset,
        crate::modules::auth::controller::get_me,
        crate::modules::users::controller::get_users,
        crate::modules::users::controller::get_user,
        crate::modules::users::controller::create_user,
        crate::modules::users::controller::update_user,
        crate::modules::users::controller::delete_user,
        crate::modules::pages::controller::get_pages,
        crate::modules::pages::controller::get_page,
        crate::modules::pages::controller::get_page_by_slug,
        crate::modules::pages::controller::create_page,
        crate::modules::pages::controller::update_page,
        crate::modules::pages::controller::delete_page,
        crate::modules::pages::controller::get_revisions,
        crate::modules::pages::controller::create_revision,
        crate::modules::page_blocks::controller::get_page_blocks,
        crate::modules::page_blocks::controller::get_page_block,
        crate::modules::page_blocks::controller::create_page_block,
        crate::modules::page_blocks::controller::update_page_block,
        crate::modules::page_blocks::controller::delete_page_block,
        crate::modules::media::controller::upload_media,
        crate::modules::media::controller::get_media_list,
        crate::modules::media::controller::get_media,
        crate::modules::media::controller::delete_media,
        crate::modules::settings::controller::get_public_settings,
        crate::modules::settings::controller::list_settings,
        crate::modules::settings::controller::get_setting,
        crate::modules::settings::controller::create_setting,
        crate::modules::settings::controller::update_setting,
        crate::modules::settings::controller::upsert_setting,
        crate::modules::settings::controller::delete_setting,
        crate::modules::audit_logs::controller::list_audit_logs,
        crate::modules::audit_logs::controller::get_audit_log,
        crate::modules::audit_logs::controller::delete_audit_log,
    ),
    components(
        schemas(
            HealthResponse,
            ErrorResponse,
            MessageResponse,
            Role,
            RegisterRequest,
            LoginForm,
            TokenResponse,
            MeResponse,
            PasswordResetRequest,
            PasswordResetTokenResponse,
            PasswordResetConfirm,
            UserResponse,
            CreateUserDto,
            UpdateUserDto,
            PaginatedUsersResponse,
            Page,
            PageWithBlocks,
            CreatePageDto,
            UpdatePageDto,
            PaginatedPagesResponse,
            PageRevision,
            RevisionStatus,
            CreateRevisionDto,
            PageBlock,
            CreatePageBlockDto,
            UpdatePageBlockDto,
            PaginatedPageBlocksResponse,
            Media,
            MediaUploadForm,
            PaginatedMediaResponse,
            SiteSetting,
            CreateSettingDto,
            UpdateSettingDto,
            AuditLog,
            PaginatedAuditLogsResponse,
            PaginationMeta,
            PaginationParams,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Liveness and readiness probes"),
        (name = "Authentication", description = "Registration, login, token refresh and password reset"),
        (name = "Users", description = "User management endpoints"),
        (name = "Pages", description = "Pages and their revision history"),
        (name = "Page Blocks", description = "Content blocks placed on pages"),
        (name = "Media", description = "File uploads"),
        (name = "Site Settings", description = "Site-wide key/value settings"),
        (name = "Audit Logs", description = "Audit trail of every mutation")
    ),
    info(
        title = "Pagecraft API",
        version = "0.1.0",
        description = "Headless CMS backend built with Rust, Axum, and PostgreSQL featuring JWT authentication and role-based permissions.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}
