use sqlx::PgPool;
use tracing::instrument;

use pagecraft_core::{AppError, PaginationParams};
use pagecraft_models::{
    CreatePageBlockDto, PageBlock, PageBlockFilterParams, PaginatedPageBlocksResponse,
    UpdatePageBlockDto,
};

use crate::modules::audit_logs::{AuditService, action, resource};
use crate::modules::pages::service::PageService;

const BLOCK_COLUMNS: &str = "id, page_id, block_type, content, sort_order, is_visible, \
                             created_by_id, created_at, updated_at";

fn block_not_found() -> AppError {
    AppError::not_found(anyhow::anyhow!("Page block not found"))
}

pub struct PageBlockService;

impl PageBlockService {
    /// Blocks of one page in display order.
    pub async fn list_for_page(db: &PgPool, page_id: i64) -> Result<Vec<PageBlock>, AppError> {
        let blocks = sqlx::query_as::<_, PageBlock>(&format!(
            "SELECT {BLOCK_COLUMNS} FROM page_blocks
             WHERE page_id = $1
             ORDER BY sort_order, id"
        ))
        .bind(page_id)
        .fetch_all(db)
        .await?;

        Ok(blocks)
    }

    /// With a `page_id` filter the blocks come in display order, otherwise
    /// newest first.
    #[instrument(skip(db))]
    pub async fn list(
        db: &PgPool,
        filters: PageBlockFilterParams,
        pagination: PaginationParams,
    ) -> Result<PaginatedPageBlocksResponse, AppError> {
        let order_by = if filters.page_id.is_some() {
            "sort_order, id"
        } else {
            "created_at DESC, id DESC"
        };

        let total = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM page_blocks WHERE ($1::BIGINT IS NULL OR page_id = $1)",
        )
        .bind(filters.page_id)
        .fetch_one(db)
        .await?;

        let data = sqlx::query_as::<_, PageBlock>(&format!(
            "SELECT {BLOCK_COLUMNS} FROM page_blocks
             WHERE ($1::BIGINT IS NULL OR page_id = $1)
             ORDER BY {order_by}
             LIMIT $2 OFFSET $3"
        ))
        .bind(filters.page_id)
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(db)
        .await?;

        Ok(PaginatedPageBlocksResponse {
            data,
            meta: pagination.meta(total),
        })
    }

    #[instrument(skip(db))]
    pub async fn get(db: &PgPool, id: i64) -> Result<PageBlock, AppError> {
        sqlx::query_as::<_, PageBlock>(&format!(
            "SELECT {BLOCK_COLUMNS} FROM page_blocks WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or_else(block_not_found)
    }

    #[instrument(skip(db, dto), fields(page_id = dto.page_id, block_type = %dto.block_type))]
    pub async fn create(
        db: &PgPool,
        dto: CreatePageBlockDto,
        actor_id: i64,
    ) -> Result<PageBlock, AppError> {
        let mut tx = db.begin().await?;
        PageService::ensure_exists(&mut *tx, dto.page_id).await?;

        let block = sqlx::query_as::<_, PageBlock>(&format!(
            "INSERT INTO page_blocks (page_id, block_type, content, sort_order, is_visible, created_by_id)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {BLOCK_COLUMNS}"
        ))
        .bind(dto.page_id)
        .bind(&dto.block_type)
        .bind(&dto.content)
        .bind(dto.sort_order)
        .bind(dto.is_visible)
        .bind(actor_id)
        .fetch_one(&mut *tx)
        .await?;

        AuditService::record(&mut *tx, actor_id, action::CREATE, resource::PAGE_BLOCK, block.id)
            .await?;
        tx.commit().await?;

        Ok(block)
    }

    #[instrument(skip(db, dto))]
    pub async fn update(
        db: &PgPool,
        id: i64,
        dto: UpdatePageBlockDto,
        actor_id: i64,
    ) -> Result<PageBlock, AppError> {
        let mut tx = db.begin().await?;

        let block = sqlx::query_as::<_, PageBlock>(&format!(
            "UPDATE page_blocks
             SET block_type = COALESCE($2, block_type),
                 content = COALESCE($3, content),
                 sort_order = COALESCE($4, sort_order),
                 is_visible = COALESCE($5, is_visible),
                 updated_at = NOW()
             WHERE id = $1
             RETURNING {BLOCK_COLUMNS}"
        ))
        .bind(id)
        .bind(&dto.block_type)
        .bind(&dto.content)
        .bind(dto.sort_order)
        .bind(dto.is_visible)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(block_not_found)?;

        AuditService::record(&mut *tx, actor_id, action::UPDATE, resource::PAGE_BLOCK, block.id)
            .await?;
        tx.commit().await?;

        Ok(block)
    }

    #[instrument(skip(db))]
    pub async fn delete(db: &PgPool, id: i64, actor_id: i64) -> Result<(), AppError> {
        let mut tx = db.begin().await?;

        let deleted = sqlx::query("DELETE FROM page_blocks WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if deleted.rows_affected() == 0 {
            return Err(block_not_found());
        }

        AuditService::record(&mut *tx, actor_id, action::DELETE, resource::PAGE_BLOCK, id).await?;
        tx.commit().await?;

        Ok(())
    }
}
