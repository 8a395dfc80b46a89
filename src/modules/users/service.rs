use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool};
use tracing::instrument;

use pagecraft_auth::{Role, revocation};
use pagecraft_core::{AppError, PaginationParams, hash_password};
use pagecraft_models::{
    CreateUserDto, PaginatedUsersResponse, UpdateUserDto, User, UserFilterParams, UserResponse,
};
use pagecraft_observability::track_user_created;

use crate::modules::audit_logs::{AuditService, action, resource};

pub(crate) const USER_COLUMNS: &str =
    "id, email, hashed_password, role, is_active, last_token_issue, created_at, updated_at";

/// A user row about to be inserted.
#[derive(Debug)]
pub struct NewUser<'a> {
    pub email: &'a str,
    pub hashed_password: &'a str,
    pub role: Role,
    pub is_active: bool,
}

fn map_unique_email(err: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &err
        && db_err.is_unique_violation()
    {
        return AppError::bad_request(anyhow::anyhow!("Email already registered"));
    }
    AppError::from(err)
}

fn user_not_found() -> AppError {
    AppError::not_found(anyhow::anyhow!("User not found"))
}

pub struct UserService;

impl UserService {
    /// Inserts on `conn` so callers can audit in the same transaction.
    #[instrument(skip(conn, user), fields(email = user.email, role = %user.role))]
    pub async fn insert(conn: &mut PgConnection, user: NewUser<'_>) -> Result<User, AppError> {
        let created = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (email, hashed_password, role, is_active)
             VALUES ($1, $2, $3, $4)
             RETURNING {USER_COLUMNS}"
        ))
        .bind(user.email)
        .bind(user.hashed_password)
        .bind(user.role)
        .bind(user.is_active)
        .fetch_one(conn)
        .await
        .map_err(map_unique_email)?;

        track_user_created(created.role.as_str());
        Ok(created)
    }

    #[instrument(skip(db))]
    pub async fn find_by_email(db: &PgPool, email: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(db)
        .await?;

        Ok(user)
    }

    #[instrument(skip(db))]
    pub async fn get_by_id(db: &PgPool, id: i64) -> Result<User, AppError> {
        sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(id)
            .fetch_optional(db)
            .await?
            .ok_or_else(user_not_found)
    }

    /// Row-locks the user for the rest of the transaction.
    pub async fn lock_by_id(conn: &mut PgConnection, id: i64) -> Result<User, AppError> {
        sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1 FOR UPDATE"
        ))
        .bind(id)
        .fetch_optional(conn)
        .await?
        .ok_or_else(user_not_found)
    }

    pub async fn set_last_token_issue(
        conn: &mut PgConnection,
        id: i64,
        instant: DateTime<Utc>,
    ) -> Result<(), AppError> {
        sqlx::query("UPDATE users SET last_token_issue = $2 WHERE id = $1")
            .bind(id)
            .bind(instant)
            .execute(conn)
            .await?;
        Ok(())
    }

    /// Revokes every outstanding refresh and reset token of a locked user.
    pub async fn revoke_tokens(
        conn: &mut PgConnection,
        user: &User,
        now: DateTime<Utc>,
    ) -> Result<DateTime<Utc>, AppError> {
        let instant = revocation::revocation_instant(now, user.last_token_issue);
        Self::set_last_token_issue(conn, user.id, instant).await?;
        tracing::info!(user_id = user.id, "tokens revoked");
        Ok(instant)
    }

    #[instrument(skip(db))]
    pub async fn list(
        db: &PgPool,
        filters: UserFilterParams,
        pagination: PaginationParams,
    ) -> Result<PaginatedUsersResponse, AppError> {
        const WHERE: &str = "WHERE ($1::TEXT IS NULL OR role = $1)
               AND ($2::BOOLEAN IS NULL OR is_active = $2)";

        let total = sqlx::query_scalar::<_, i64>(&format!("SELECT COUNT(*) FROM users {WHERE}"))
            .bind(&filters.role)
            .bind(filters.is_active)
            .fetch_one(db)
            .await?;

        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users {WHERE}
             ORDER BY id
             LIMIT $3 OFFSET $4"
        ))
        .bind(&filters.role)
        .bind(filters.is_active)
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(db)
        .await?;

        Ok(PaginatedUsersResponse {
            data: users.into_iter().map(UserResponse::from).collect(),
            meta: pagination.meta(total),
        })
    }

    #[instrument(skip(db, dto), fields(email = %dto.email))]
    pub async fn create(db: &PgPool, dto: CreateUserDto, actor_id: i64) -> Result<User, AppError> {
        let hashed = hash_password(&dto.password)?;

        let mut tx = db.begin().await?;
        let user = Self::insert(
            &mut *tx,
            NewUser {
                email: &dto.email,
                hashed_password: &hashed,
                role: dto.role,
                is_active: dto.is_active,
            },
        )
        .await?;
        AuditService::record(&mut *tx, actor_id, action::CREATE, resource::USER, user.id).await?;
        tx.commit().await?;

        Ok(user)
    }

    /// Applies a partial update. A new password, a new email or a
    /// deactivation also revokes the user's refresh and reset tokens.
    #[instrument(skip(db, dto))]
    pub async fn update(
        db: &PgPool,
        id: i64,
        dto: UpdateUserDto,
        actor_id: i64,
    ) -> Result<User, AppError> {
        let hashed = dto.password.as_deref().map(hash_password).transpose()?;

        let mut tx = db.begin().await?;
        let current = Self::lock_by_id(&mut *tx, id).await?;

        let deactivated = current.is_active && dto.is_active == Some(false);
        let email_changed = dto.email.as_ref().is_some_and(|email| *email != current.email);
        let last_token_issue = if hashed.is_some() || deactivated || email_changed {
            revocation::revocation_instant(Utc::now(), current.last_token_issue)
        } else {
            current.last_token_issue
        };

        let user = sqlx::query_as::<_, User>(&format!(
            "UPDATE users
             SET email = $2, hashed_password = $3, role = $4, is_active = $5,
                 last_token_issue = $6, updated_at = NOW()
             WHERE id = $1
             RETURNING {USER_COLUMNS}"
        ))
        .bind(id)
        .bind(dto.email.as_deref().unwrap_or(&current.email))
        .bind(hashed.as_deref().unwrap_or(&current.hashed_password))
        .bind(dto.role.unwrap_or(current.role))
        .bind(dto.is_active.unwrap_or(current.is_active))
        .bind(last_token_issue)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_unique_email)?;

        AuditService::record(&mut *tx, actor_id, action::UPDATE, resource::USER, user.id).await?;
        tx.commit().await?;

        Ok(user)
    }

    #[instrument(skip(db))]
    pub async fn delete(db: &PgPool, id: i64, actor_id: i64) -> Result<(), AppError> {
        if id == actor_id {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "You cannot delete your own account"
            )));
        }

        let mut tx = db.begin().await?;
        let deleted = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if deleted.rows_affected() == 0 {
            return Err(user_not_found());
        }

        AuditService::record(&mut *tx, actor_id, action::DELETE, resource::USER, id).await?;
        tx.commit().await?;

        Ok(())
    }
}
