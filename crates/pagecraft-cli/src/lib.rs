//! # Pagecraft CLI
//!
//! Administrative commands and database seeding for development.
//!
//! ```ignore
//! use pagecraft_cli::seeder::{SeedConfig, seed_all};
//!
//! let config = SeedConfig::default().with_users(50).with_pages(20);
//! seed_all(&pool, config).await?;
//! ```

pub mod seeder;
