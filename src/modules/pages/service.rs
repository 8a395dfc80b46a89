use sqlx::{PgConnection, PgPool};
use tracing::instrument;

use pagecraft_core::{AppError, PaginationParams};
use pagecraft_models::{
    CreatePageDto, CreateRevisionDto, Page, PageFilterParams, PageRevision, PageWithBlocks,
    PaginatedPagesResponse, UpdatePageDto,
};

use crate::modules::audit_logs::{AuditService, action, resource};
use crate::modules::page_blocks::service::PageBlockService;

const PAGE_COLUMNS: &str = "id, slug, title, is_published, created_at, updated_at";
const REVISION_COLUMNS: &str = "id, page_id, content, status, created_by_user_id, created_at";

fn page_not_found() -> AppError {
    AppError::not_found(anyhow::anyhow!("Page not found"))
}

fn map_unique_slug(err: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &err
        && db_err.is_unique_violation()
    {
        return AppError::bad_request(anyhow::anyhow!("A page with this slug already exists"));
    }
    AppError::from(err)
}

pub struct PageService;

impl PageService {
    #[instrument(skip(db))]
    pub async fn list(
        db: &PgPool,
        filters: PageFilterParams,
        pagination: PaginationParams,
    ) -> Result<PaginatedPagesResponse, AppError> {
        const WHERE: &str = "WHERE ($1::BOOLEAN IS NULL OR is_published = $1)";

        let total = sqlx::query_scalar::<_, i64>(&format!("SELECT COUNT(*) FROM pages {WHERE}"))
            .bind(filters.is_published)
            .fetch_one(db)
            .await?;

        let data = sqlx::query_as::<_, Page>(&format!(
            "SELECT {PAGE_COLUMNS} FROM pages {WHERE}
             ORDER BY created_at DESC, id DESC
             LIMIT $2 OFFSET $3"
        ))
        .bind(filters.is_published)
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(db)
        .await?;

        Ok(PaginatedPagesResponse {
            data,
            meta: pagination.meta(total),
        })
    }

    #[instrument(skip(db))]
    pub async fn get_page(db: &PgPool, id: i64) -> Result<Page, AppError> {
        sqlx::query_as::<_, Page>(&format!("SELECT {PAGE_COLUMNS} FROM pages WHERE id = $1"))
            .bind(id)
            .fetch_optional(db)
            .await?
            .ok_or_else(page_not_found)
    }

    /// Page with its blocks in display order.
    #[instrument(skip(db))]
    pub async fn get_with_blocks(db: &PgPool, id: i64) -> Result<PageWithBlocks, AppError> {
        let page = Self::get_page(db, id).await?;
        let blocks = PageBlockService::list_for_page(db, page.id).await?;
        Ok(PageWithBlocks { page, blocks })
    }

    #[instrument(skip(db))]
    pub async fn get_by_slug(db: &PgPool, slug: &str) -> Result<PageWithBlocks, AppError> {
        let page =
            sqlx::query_as::<_, Page>(&format!("SELECT {PAGE_COLUMNS} FROM pages WHERE slug = $1"))
                .bind(slug)
                .fetch_optional(db)
                .await?
                .ok_or_else(page_not_found)?;

        let blocks = PageBlockService::list_for_page(db, page.id).await?;
        Ok(PageWithBlocks { page, blocks })
    }

    /// Fails with 404 unless the page exists; used before touching children.
    pub async fn ensure_exists(conn: &mut PgConnection, id: i64) -> Result<(), AppError> {
        let exists = sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM pages WHERE id = $1)")
            .bind(id)
            .fetch_one(conn)
            .await?;

        if exists { Ok(()) } else { Err(page_not_found()) }
    }

    #[instrument(skip(db, dto), fields(slug = %dto.slug))]
    pub async fn create(db: &PgPool, dto: CreatePageDto, actor_id: i64) -> Result<Page, AppError> {
        let mut tx = db.begin().await?;

        let page = sqlx::query_as::<_, Page>(&format!(
            "INSERT INTO pages (slug, title, is_published)
             VALUES ($1, $2, $3)
             RETURNING {PAGE_COLUMNS}"
        ))
        .bind(&dto.slug)
        .bind(&dto.title)
        .bind(dto.is_published)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_unique_slug)?;

        AuditService::record(&mut *tx, actor_id, action::CREATE, resource::PAGE, page.id).await?;
        tx.commit().await?;

        Ok(page)
    }

    #[instrument(skip(db, dto))]
    pub async fn update(
        db: &PgPool,
        id: i64,
        dto: UpdatePageDto,
        actor_id: i64,
    ) -> Result<Page, AppError> {
        let mut tx = db.begin().await?;

        let page = sqlx::query_as::<_, Page>(&format!(
            "UPDATE pages
             SET slug = COALESCE($2, slug),
                 title = COALESCE($3, title),
                 is_published = COALESCE($4, is_published),
                 updated_at = NOW()
             WHERE id = $1
             RETURNING {PAGE_COLUMNS}"
        ))
        .bind(id)
        .bind(&dto.slug)
        .bind(&dto.title)
        .bind(dto.is_published)
        .fetch_optional(&mut *tx)
        .await
        .map_err(map_unique_slug)?
        .ok_or_else(page_not_found)?;

        AuditService::record(&mut *tx, actor_id, action::UPDATE, resource::PAGE, page.id).await?;
        tx.commit().await?;

        Ok(page)
    }

    /// Deletes the page; its blocks and revisions go with it.
    #[instrument(skip(db))]
    pub async fn delete(db: &PgPool, id: i64, actor_id: i64) -> Result<(), AppError> {
        let mut tx = db.begin().await?;

        let deleted = sqlx::query("DELETE FROM pages WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if deleted.rows_affected() == 0 {
            return Err(page_not_found());
        }

        AuditService::record(&mut *tx, actor_id, action::DELETE, resource::PAGE, id).await?;
        tx.commit().await?;

        Ok(())
    }

    #[instrument(skip(db))]
    pub async fn list_revisions(db: &PgPool, page_id: i64) -> Result<Vec<PageRevision>, AppError> {
        let mut conn = db.acquire().await?;
        Self::ensure_exists(&mut *conn, page_id).await?;

        let revisions = sqlx::query_as::<_, PageRevision>(&format!(
            "SELECT {REVISION_COLUMNS} FROM page_revisions
             WHERE page_id = $1
             ORDER BY created_at DESC, id DESC"
        ))
        .bind(page_id)
        .fetch_all(&mut *conn)
        .await?;

        Ok(revisions)
    }

    #[instrument(skip(db, dto), fields(status = %dto.status))]
    pub async fn create_revision(
        db: &PgPool,
        page_id: i64,
        dto: CreateRevisionDto,
        actor_id: i64,
    ) -> Result<PageRevision, AppError> {
        let mut tx = db.begin().await?;
        Self::ensure_exists(&mut *tx, page_id).await?;

        let revision = sqlx::query_as::<_, PageRevision>(&format!(
            "INSERT INTO page_revisions (page_id, content, status, created_by_user_id)
             VALUES ($1, $2, $3, $4)
             RETURNING {REVISION_COLUMNS}"
        ))
        .bind(page_id)
        .bind(&dto.content)
        .bind(dto.status.as_str())
        .bind(actor_id)
        .fetch_one(&mut *tx)
        .await?;

        AuditService::record(
            &mut *tx,
            actor_id,
            action::CREATE,
            resource::PAGE_REVISION,
            revision.id,
        )
        .await?;
        tx.commit().await?;

        Ok(revision)
    }
}
