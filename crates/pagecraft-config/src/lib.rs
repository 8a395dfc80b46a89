//! # Pagecraft Config
//!
//! Configuration structures loaded from environment variables:
//!
//! - [`jwt`]: token signing, lifetimes and refresh cookie settings
//! - [`cors`]: allowed browser origins
//! - [`media`]: upload directory, public URL and upload limits
//! - [`server`]: bind address
//!
//! Every struct has a `from_env()` constructor. Only `JWT_SECRET` is
//! mandatory; everything else falls back to a development default.
//!
//! ```ignore
//! use pagecraft_config::{CorsConfig, JwtConfig, MediaConfig, ServerConfig};
//!
//! let jwt_config = JwtConfig::from_env()?;
//! let cors_config = CorsConfig::from_env();
//! ```

pub mod cors;
mod env;
pub mod jwt;
pub mod media;
pub mod server;

pub use cors::CorsConfig;
pub use env::ConfigError;
pub use jwt::JwtConfig;
pub use media::MediaConfig;
pub use server::ServerConfig;
