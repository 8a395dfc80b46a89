//! # Pagecraft Auth
//!
//! Authentication and authorization building blocks:
//!
//! - [`role`]: the closed set of user roles
//! - [`claims`]: JWT claim structure shared by every token type
//! - [`tokens`]: [`TokenService`], which issues and verifies access, refresh
//!   and password-reset tokens with a single HS256 secret
//! - [`revocation`]: clock arithmetic behind the per-user `last_token_issue`
//!   revocation timestamp
//! - [`registry`]: the role to permission mapping and the any-match gate
//! - [`error`]: [`AuthError`] and its HTTP mapping
//!
//! Token work is synchronous; callers pass `now` explicitly so expiry and
//! revocation are deterministic under test.
//!
//! ```ignore
//! use pagecraft_auth::{PermissionRegistry, TokenService, TokenSubject, TokenType};
//!
//! let tokens = TokenService::new(&jwt_config);
//! let subject = TokenSubject::new("a@x.com").with_user(1, Role::Public);
//! let token = tokens.access_token(&subject, Utc::now())?;
//! let claims = tokens.verify(&token, TokenType::Access, Utc::now())?;
//!
//! let registry = PermissionRegistry::new();
//! registry.authorize(claims.role_name(), &[permissions::PUBLIC_VIEW])?;
//! ```

pub mod claims;
pub mod error;
pub mod registry;
pub mod revocation;
pub mod role;
pub mod tokens;

pub use claims::{Claims, TokenType};
pub use error::AuthError;
pub use registry::PermissionRegistry;
pub use role::Role;
pub use tokens::{TokenService, TokenSubject};
