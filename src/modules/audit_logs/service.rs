use sqlx::{PgConnection, PgPool};
use tracing::instrument;

use pagecraft_core::{AppError, PaginationParams};
use pagecraft_models::{AuditLog, AuditLogFilterParams, PaginatedAuditLogsResponse};

/// Action names written to `audit_logs.action`.
pub mod action {
    pub const REGISTER: &str = "register";
    pub const LOGIN: &str = "login";
    pub const LOGOUT: &str = "logout";
    pub const PASSWORD_RESET_REQUEST: &str = "password_reset_request";
    pub const PASSWORD_RESET_CONFIRM: &str = "password_reset_confirm";
    pub const CREATE: &str = "create";
    pub const UPDATE: &str = "update";
    pub const DELETE: &str = "delete";
    pub const UPLOAD: &str = "upload";
}

/// Resource names written to `audit_logs.resource_type`.
pub mod resource {
    pub const USER: &str = "user";
    pub const PAGE: &str = "page";
    pub const PAGE_BLOCK: &str = "page_block";
    pub const PAGE_REVISION: &str = "page_revision";
    pub const MEDIA: &str = "media";
    pub const SITE_SETTING: &str = "site_setting";
    pub const AUDIT_LOG: &str = "audit_log";
}

const AUDIT_COLUMNS: &str = "id, user_id, action, resource_type, resource_id, timestamp";

pub struct AuditService;

impl AuditService {
    /// Appends one entry on `conn`, which callers pass from the transaction
    /// that performs the mutation being described.
    #[instrument(skip(conn))]
    pub async fn record(
        conn: &mut PgConnection,
        actor_id: i64,
        action: &str,
        resource_type: &str,
        resource_id: i64,
    ) -> Result<AuditLog, AppError> {
        let entry = sqlx::query_as::<_, AuditLog>(&format!(
            "INSERT INTO audit_logs (user_id, action, resource_type, resource_id)
             VALUES ($1, $2, $3, $4)
             RETURNING {AUDIT_COLUMNS}"
        ))
        .bind(actor_id)
        .bind(action)
        .bind(resource_type)
        .bind(resource_id)
        .fetch_one(conn)
        .await?;

        tracing::debug!(audit_id = entry.id, "audit entry recorded");
        Ok(entry)
    }

    #[instrument(skip(db))]
    pub async fn list(
        db: &PgPool,
        filters: AuditLogFilterParams,
        pagination: PaginationParams,
    ) -> Result<PaginatedAuditLogsResponse, AppError> {
        const WHERE: &str = "WHERE ($1::BIGINT IS NULL OR user_id = $1)
               AND ($2::TEXT IS NULL OR resource_type = $2)
               AND ($3::BIGINT IS NULL OR resource_id = $3)
               AND ($4::TEXT IS NULL OR action = $4)";

        let total = sqlx::query_scalar::<_, i64>(&format!("SELECT COUNT(*) FROM audit_logs {WHERE}"))
            .bind(filters.user_id)
            .bind(&filters.resource_type)
            .bind(filters.resource_id)
            .bind(&filters.action)
            .fetch_one(db)
            .await?;

        let data = sqlx::query_as::<_, AuditLog>(&format!(
            "SELECT {AUDIT_COLUMNS} FROM audit_logs {WHERE}
             ORDER BY timestamp DESC, id DESC
             LIMIT $5 OFFSET $6"
        ))
        .bind(filters.user_id)
        .bind(&filters.resource_type)
        .bind(filters.resource_id)
        .bind(&filters.action)
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(db)
        .await?;

        Ok(PaginatedAuditLogsResponse {
            data,
            meta: pagination.meta(total),
        })
    }

    #[instrument(skip(db))]
    pub async fn get(db: &PgPool, id: i64) -> Result<AuditLog, AppError> {
        sqlx::query_as::<_, AuditLog>(&format!(
            "SELECT {AUDIT_COLUMNS} FROM audit_logs WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Audit log not found")))
    }

    /// Removes one entry and records who removed it.
    #[instrument(skip(db))]
    pub async fn delete(db: &PgPool, id: i64, actor_id: i64) -> Result<(), AppError> {
        let mut tx = db.begin().await?;

        let deleted = sqlx::query("DELETE FROM audit_logs WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if deleted.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow::anyhow!("Audit log not found")));
        }

        Self::record(&mut *tx, actor_id, action::DELETE, resource::AUDIT_LOG, id).await?;
        tx.commit().await?;

        Ok(())
    }
}
