//! User seeding: the fixed demo accounts and generated editor/public users.

use std::time::Instant;

use anyhow::Context;
use fake::Fake;
use fake::faker::name::en::{FirstName, LastName};
use rayon::prelude::*;
use sqlx::{PgConnection, PgPool};

use pagecraft_core::hash_password;
use pagecraft_models::Role;

use super::models::{DEMO_ACCOUNTS, SEED_EMAIL_DOMAIN, SEED_PASSWORD, UserSeed};

// 3 params per user
const BATCH_SIZE: usize = 1000;

fn hash(password: &str) -> anyhow::Result<String> {
    hash_password(password).map_err(|e| e.error)
}

/// Every fourth generated user is an editor, the rest are public.
fn role_for(index: usize) -> Role {
    if index % 4 == 0 {
        Role::Editor
    } else {
        Role::Public
    }
}

/// Builds `count` users. bcrypt dominates the cost, so hashing runs on the
/// rayon pool.
pub fn generate_users(count: usize) -> anyhow::Result<Vec<UserSeed>> {
    (0..count)
        .into_par_iter()
        .map(|index| {
            let first_name: String = FirstName().fake();
            let last_name: String = LastName().fake();
            let email = format!(
                "{}.{}+{}@{}",
                first_name.to_lowercase(),
                last_name.to_lowercase(),
                index,
                SEED_EMAIL_DOMAIN
            )
            .replace(['\'', ' '], "");

            Ok(UserSeed {
                email,
                hashed_password: hash(SEED_PASSWORD)?,
                role: role_for(index),
            })
        })
        .collect()
}

/// Creates the admin, editor and public demo logins when no user exists yet.
/// Returns how many were inserted.
pub async fn seed_demo_accounts(db: &PgPool) -> anyhow::Result<usize> {
    let existing = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
        .fetch_one(db)
        .await?;

    if existing > 0 {
        println!("ℹ️  Users already exist; skipping demo accounts");
        return Ok(0);
    }

    let users = DEMO_ACCOUNTS
        .par_iter()
        .map(|account| {
            Ok(UserSeed {
                email: account.email.to_string(),
                hashed_password: hash(account.password)?,
                role: account.role,
            })
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    let inserted = insert_users_batch(db, &users).await?;
    for account in &DEMO_ACCOUNTS {
        println!(
            "   ✓ {} / {} ({})",
            account.email,
            account.password,
            account.role.as_str()
        );
    }

    Ok(inserted)
}

/// Generates and inserts `count` users.
pub async fn seed_users(db: &PgPool, count: usize) -> anyhow::Result<usize> {
    let start_time = Instant::now();
    println!("👥 Seeding {count} users (password: {SEED_PASSWORD})...");

    let users = generate_users(count)?;
    let inserted = insert_users_batch(db, &users).await?;

    println!(
        "   ✓ Inserted {} users in {:?}",
        inserted,
        start_time.elapsed()
    );

    Ok(inserted)
}

/// Inserts users in chunks inside one transaction. Emails that already exist
/// are skipped.
pub async fn insert_users_batch(db: &PgPool, users: &[UserSeed]) -> anyhow::Result<usize> {
    let mut tx = db.begin().await?;
    let mut inserted = 0;

    for chunk in users.chunks(BATCH_SIZE) {
        inserted += insert_users_chunk(&mut *tx, chunk).await?;
    }

    tx.commit().await?;
    Ok(inserted)
}

async fn insert_users_chunk(conn: &mut PgConnection, users: &[UserSeed]) -> anyhow::Result<usize> {
    if users.is_empty() {
        return Ok(0);
    }

    let mut query = String::from("INSERT INTO users (email, hashed_password, role) VALUES ");

    for (i, _) in users.iter().enumerate() {
        if i > 0 {
            query.push_str(", ");
        }
        let param_idx = i * 3;
        query.push_str(&format!(
            "(${}, ${}, ${})",
            param_idx + 1,
            param_idx + 2,
            param_idx + 3
        ));
    }

    query.push_str(" ON CONFLICT (email) DO NOTHING");

    let mut q = sqlx::query(&query);
    for user in users {
        q = q
            .bind(&user.email)
            .bind(&user.hashed_password)
            .bind(user.role.as_str());
    }

    let result = q.execute(conn).await.context("Failed to insert users")?;
    Ok(result.rows_affected() as usize)
}

/// Creates a single admin account.
pub async fn create_admin(db: &PgPool, email: &str, password: &str) -> anyhow::Result<i64> {
    let hashed_password = hash(password)?;

    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO users (email, hashed_password, role, is_active)
         VALUES ($1, $2, $3, TRUE)
         ON CONFLICT (email) DO NOTHING
         RETURNING id",
    )
    .bind(email)
    .bind(&hashed_password)
    .bind(Role::Admin.as_str())
    .fetch_optional(db)
    .await?;

    id.with_context(|| format!("A user with email {email} already exists"))
}

/// Deletes every generated user. Demo accounts and real users are kept.
pub async fn clear_users(db: &PgPool) -> anyhow::Result<u64> {
    let result = sqlx::query("DELETE FROM users WHERE email LIKE $1")
        .bind(format!("%@{SEED_EMAIL_DOMAIN}"))
        .execute(db)
        .await?;

    Ok(result.rows_affected())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roles_are_mostly_public() {
        let editors = (0..100).filter(|&i| role_for(i) == Role::Editor).count();
        assert_eq!(editors, 25);
        assert_eq!(role_for(1), Role::Public);
    }

    #[test]
    fn generated_users_use_the_seed_domain() {
        let users = generate_users(3).unwrap();
        assert_eq!(users.len(), 3);

        for (index, user) in users.iter().enumerate() {
            assert!(user.email.ends_with(&format!("+{index}@{SEED_EMAIL_DOMAIN}")));
            assert!(!user.email.contains(' '));
            assert!(user.hashed_password.starts_with("$2"));
        }
    }
}
