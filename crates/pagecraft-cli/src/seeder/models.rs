//! Seed records and seeding configuration.

use pagecraft_models::Role;

/// Email domain of every generated user. `clear-seed` deletes by it.
pub const SEED_EMAIL_DOMAIN: &str = "seed.pagecraft.local";

/// Slug prefix of every generated page. `clear-seed` deletes by it.
pub const SEED_SLUG_PREFIX: &str = "seed-";

/// Password shared by generated users.
pub const SEED_PASSWORD: &str = "SeedPass123";

/// A user row ready for insertion.
pub struct UserSeed {
    pub email: String,
    pub hashed_password: String,
    pub role: Role,
}

/// A draft page and the text of its single block.
pub struct PageSeed {
    pub slug: String,
    pub title: String,
    pub body: String,
}

/// A fixed login created on an empty database.
pub struct DemoAccount {
    pub email: &'static str,
    pub password: &'static str,
    pub role: Role,
}

pub const DEMO_ACCOUNTS: [DemoAccount; 3] = [
    DemoAccount {
        email: "admin@pagecraft.local",
        password: "AdminPass123",
        role: Role::Admin,
    },
    DemoAccount {
        email: "editor@pagecraft.local",
        password: "EditorPass123",
        role: Role::Editor,
    },
    DemoAccount {
        email: "public@pagecraft.local",
        password: "PublicPass123",
        role: Role::Public,
    },
];

#[derive(Clone, Debug)]
pub struct SeedConfig {
    pub users: usize,
    pub pages: usize,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            users: 20,
            pages: 10,
        }
    }
}

impl SeedConfig {
    pub fn with_users(mut self, users: usize) -> Self {
        self.users = users;
        self
    }

    pub fn with_pages(mut self, pages: usize) -> Self {
        self.pages = pages;
        self
    }
}
