//! Database seeding for development and demos.
//!
//! Generated users share the `seed.pagecraft.local` email domain and
//! generated pages the `seed-` slug prefix, which is how [`clear_all`] finds
//! them again.

pub mod models;
pub mod pages;
pub mod users;

use std::time::Instant;

use sqlx::PgPool;

pub use models::SeedConfig;
pub use pages::{clear_pages, seed_pages};
pub use users::{clear_users, create_admin, seed_demo_accounts, seed_users};

/// Demo accounts (on an empty database), generated users, then pages.
pub async fn seed_all(db: &PgPool, config: SeedConfig) -> anyhow::Result<()> {
    let start_time = Instant::now();
    println!("🌱 Seeding database...");

    let demo = seed_demo_accounts(db).await?;
    let users = seed_users(db, config.users).await?;
    let pages = seed_pages(db, config.pages).await?;

    println!(
        "\n✅ Seeded {} demo accounts, {} users and {} pages in {:?}",
        demo,
        users,
        pages,
        start_time.elapsed()
    );

    Ok(())
}

pub async fn clear_all(db: &PgPool) -> anyhow::Result<()> {
    println!("🗑️  Clearing seeded data...");

    let pages = clear_pages(db).await?;
    let users = clear_users(db).await?;

    println!("✅ Removed {users} seeded users and {pages} seeded pages");
    Ok(())
}
