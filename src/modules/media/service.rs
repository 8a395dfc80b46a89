use sqlx::PgPool;
use tracing::instrument;

use pagecraft_core::file_storage::{FileStorage, generate_key};
use pagecraft_core::{AppError, PaginationParams};
use pagecraft_models::{Media, PaginatedMediaResponse};
use pagecraft_observability::track_media_uploaded;

use crate::modules::audit_logs::{AuditService, action, resource};

const MEDIA_COLUMNS: &str =
    "id, filename, url, mimetype, filesize_bytes, uploaded_by_user_id, uploaded_at";

fn media_not_found() -> AppError {
    AppError::not_found(anyhow::anyhow!("Media not found"))
}

/// A file received from a multipart upload.
#[derive(Debug)]
pub struct Upload {
    pub filename: String,
    pub mimetype: String,
    pub content: Vec<u8>,
}

pub struct MediaService;

impl MediaService {
    #[instrument(skip(db))]
    pub async fn list(
        db: &PgPool,
        pagination: PaginationParams,
    ) -> Result<PaginatedMediaResponse, AppError> {
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM media")
            .fetch_one(db)
            .await?;

        let data = sqlx::query_as::<_, Media>(&format!(
            "SELECT {MEDIA_COLUMNS} FROM media
             ORDER BY uploaded_at DESC, id DESC
             LIMIT $1 OFFSET $2"
        ))
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(db)
        .await?;

        Ok(PaginatedMediaResponse {
            data,
            meta: pagination.meta(total),
        })
    }

    #[instrument(skip(db))]
    pub async fn get(db: &PgPool, id: i64) -> Result<Media, AppError> {
        sqlx::query_as::<_, Media>(&format!("SELECT {MEDIA_COLUMNS} FROM media WHERE id = $1"))
            .bind(id)
            .fetch_optional(db)
            .await?
            .ok_or_else(media_not_found)
    }

    /// Validates and stores the file, then records it. A failed insert
    /// removes the stored file again.
    #[instrument(
        skip(db, storage, upload),
        fields(filename = %upload.filename, mimetype = %upload.mimetype, size = upload.content.len())
    )]
    pub async fn upload(
        db: &PgPool,
        storage: &dyn FileStorage,
        upload: Upload,
        actor_id: i64,
    ) -> Result<Media, AppError> {
        storage.validate(upload.content.len(), &upload.mimetype)?;

        let key = generate_key(&upload.filename);
        storage.save(&key, &upload.content).await?;
        let url = storage.get_url(&key)?;

        match Self::insert(db, &upload, &url, actor_id).await {
            Ok(media) => {
                track_media_uploaded(media.filesize_bytes as u64);
                Ok(media)
            }
            Err(err) => {
                if let Err(cleanup) = storage.delete(&key).await {
                    tracing::warn!(key = %key, error = %cleanup, "failed to remove orphaned upload");
                }
                Err(err)
            }
        }
    }

    async fn insert(
        db: &PgPool,
        upload: &Upload,
        url: &str,
        actor_id: i64,
    ) -> Result<Media, AppError> {
        let mut tx = db.begin().await?;

        let media = sqlx::query_as::<_, Media>(&format!(
            "INSERT INTO media (filename, url, mimetype, filesize_bytes, uploaded_by_user_id)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {MEDIA_COLUMNS}"
        ))
        .bind(&upload.filename)
        .bind(url)
        .bind(&upload.mimetype)
        .bind(upload.content.len() as i64)
        .bind(actor_id)
        .fetch_one(&mut *tx)
        .await?;

        AuditService::record(&mut *tx, actor_id, action::UPLOAD, resource::MEDIA, media.id).await?;
        tx.commit().await?;

        Ok(media)
    }

    /// Deletes the row and records the deletion in one transaction. The file
    /// is removed only after that commits.
    #[instrument(skip(db, storage))]
    pub async fn delete(
        db: &PgPool,
        storage: &dyn FileStorage,
        id: i64,
        actor_id: i64,
    ) -> Result<(), AppError> {
        let mut tx = db.begin().await?;

        let url = sqlx::query_scalar::<_, String>("DELETE FROM media WHERE id = $1 RETURNING url")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(media_not_found)?;

        AuditService::record(&mut *tx, actor_id, action::DELETE, resource::MEDIA, id).await?;
        tx.commit().await?;

        match storage.key_from_url(&url) {
            Some(key) => {
                if let Err(err) = storage.delete(&key).await {
                    tracing::warn!(key = %key, error = %err, "media row deleted but file removal failed");
                }
            }
            None => tracing::warn!(url = %url, "media url is outside the upload directory"),
        }

        Ok(())
    }
}
