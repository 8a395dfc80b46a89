//! # Pagecraft Models
//!
//! Database entities, request/response DTOs and validation rules for every
//! resource the API exposes.
//!
//! - [`auth`]: login, token and password-reset payloads
//! - [`users`]: user accounts
//! - [`pages`]: pages and page revisions
//! - [`page_blocks`]: content blocks placed on a page
//! - [`media`]: uploaded file metadata
//! - [`settings`]: site-wide key/value settings
//! - [`audit_logs`]: the audit trail

pub mod audit_logs;
pub mod auth;
pub mod media;
pub mod page_blocks;
pub mod pages;
pub mod settings;
pub mod users;
mod validation;

pub use pagecraft_auth::Role;

pub use audit_logs::{AuditLog, AuditLogFilterParams, PaginatedAuditLogsResponse};
pub use auth::{
    LoginForm, MeResponse, MessageResponse, PasswordResetConfirm, PasswordResetRequest,
    PasswordResetTokenResponse, RegisterRequest, TokenResponse,
};
pub use media::{Media, PaginatedMediaResponse};
pub use page_blocks::{
    CreatePageBlockDto, PageBlock, PageBlockFilterParams, PaginatedPageBlocksResponse,
    UpdatePageBlockDto,
};
pub use pages::{
    CreatePageDto, CreateRevisionDto, Page, PageFilterParams, PageRevision, PageWithBlocks,
    PaginatedPagesResponse, RevisionStatus, UpdatePageDto,
};
pub use settings::{CreateSettingDto, SiteSetting, UpdateSettingDto};
pub use users::{
    CreateUserDto, PaginatedUsersResponse, UpdateUserDto, User, UserFilterParams, UserResponse,
};
