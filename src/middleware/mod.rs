//! Request extractors for authentication and authorization.
//!
//! 1. Client sends `Authorization: Bearer <access token>`
//! 2. [`auth::AuthUser`] verifies the token and loads the active user
//! 3. A `Require*` extractor checks the role grants one of its permissions
//! 4. The handler runs
//!
//! ```ignore
//! use crate::middleware::auth::{AuthUser, RequireContentEdit};
//!
//! // any authenticated user
//! async fn me(auth_user: AuthUser) -> impl IntoResponse { /* ... */ }
//!
//! // role must hold `content.edit`
//! async fn update_page(RequireContentEdit(auth_user): RequireContentEdit) { /* ... */ }
//! ```
//!
//! Request logging and metrics middleware live in `pagecraft-observability`.

pub mod auth;
