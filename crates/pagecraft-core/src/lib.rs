//! # Pagecraft Core
//!
//! Core types, errors, and utilities for the Pagecraft API.
//!
//! - [`errors`]: Application error type with HTTP response conversion
//! - [`pagination`]: Pagination utilities for list endpoints
//! - [`password`]: Password hashing and verification
//! - [`file_storage`]: Storage backend abstraction used by media uploads
//! - [`permissions`]: Permission string constants
//! - [`serde`]: Custom deserialization helpers for query strings
//!
//! # Example
//!
//! ```ignore
//! use pagecraft_core::errors::AppError;
//! use pagecraft_core::password::{hash_password, verify_password};
//!
//! let error = AppError::not_found(anyhow::anyhow!("Page not found"));
//! let hash = hash_password("secure_password")?;
//! ```

pub mod errors;
pub mod file_storage;
pub mod pagination;
pub mod password;
pub mod permissions;
pub mod serde;

pub use errors::AppError;
pub use pagination::{PaginationMeta, PaginationParams};
pub use password::{hash_password, verify_password};
