use std::collections::BTreeMap;

use sqlx::{PgConnection, PgPool};
use tracing::instrument;

use pagecraft_core::AppError;
use pagecraft_models::{CreateSettingDto, SiteSetting};

use crate::modules::audit_logs::{AuditService, action, resource};

const SETTING_COLUMNS: &str = "id, key, value, updated_at";

fn setting_not_found() -> AppError {
    AppError::not_found(anyhow::anyhow!("Setting not found"))
}

pub struct SettingsService;

impl SettingsService {
    #[instrument(skip(db))]
    pub async fn list(db: &PgPool) -> Result<Vec<SiteSetting>, AppError> {
        let settings = sqlx::query_as::<_, SiteSetting>(&format!(
            "SELECT {SETTING_COLUMNS} FROM site_settings ORDER BY key"
        ))
        .fetch_all(db)
        .await?;

        Ok(settings)
    }

    /// Every setting as a flat `{key: value}` map.
    #[instrument(skip(db))]
    pub async fn public_map(db: &PgPool) -> Result<BTreeMap<String, String>, AppError> {
        let rows = sqlx::query_as::<_, (String, String)>("SELECT key, value FROM site_settings")
            .fetch_all(db)
            .await?;

        Ok(rows.into_iter().collect())
    }

    #[instrument(skip(db))]
    pub async fn get(db: &PgPool, key: &str) -> Result<SiteSetting, AppError> {
        sqlx::query_as::<_, SiteSetting>(&format!(
            "SELECT {SETTING_COLUMNS} FROM site_settings WHERE key = $1"
        ))
        .bind(key)
        .fetch_optional(db)
        .await?
        .ok_or_else(setting_not_found)
    }

    async fn insert(
        conn: &mut PgConnection,
        key: &str,
        value: &str,
    ) -> Result<SiteSetting, AppError> {
        sqlx::query_as::<_, SiteSetting>(&format!(
            "INSERT INTO site_settings (key, value)
             VALUES ($1, $2)
             RETURNING {SETTING_COLUMNS}"
        ))
        .bind(key)
        .bind(value)
        .fetch_one(conn)
        .await
        .map_err(|err| match &err {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => AppError::bad_request(
                anyhow::anyhow!("Setting with key '{key}' already exists"),
            ),
            _ => AppError::from(err),
        })
    }

    async fn update_value(
        conn: &mut PgConnection,
        key: &str,
        value: &str,
    ) -> Result<Option<SiteSetting>, AppError> {
        let setting = sqlx::query_as::<_, SiteSetting>(&format!(
            "UPDATE site_settings SET value = $2, updated_at = NOW()
             WHERE key = $1
             RETURNING {SETTING_COLUMNS}"
        ))
        .bind(key)
        .bind(value)
        .fetch_optional(conn)
        .await?;

        Ok(setting)
    }

    #[instrument(skip(db, dto), fields(key = %dto.key))]
    pub async fn create(
        db: &PgPool,
        dto: CreateSettingDto,
        actor_id: i64,
    ) -> Result<SiteSetting, AppError> {
        let mut tx = db.begin().await?;
        let setting = Self::insert(&mut *tx, &dto.key, &dto.value).await?;
        AuditService::record(&mut *tx, actor_id, action::CREATE, resource::SITE_SETTING, setting.id)
            .await?;
        tx.commit().await?;

        Ok(setting)
    }

    #[instrument(skip(db, value))]
    pub async fn update(
        db: &PgPool,
        key: &str,
        value: &str,
        actor_id: i64,
    ) -> Result<SiteSetting, AppError> {
        let mut tx = db.begin().await?;
        let setting = Self::update_value(&mut *tx, key, value)
            .await?
            .ok_or_else(setting_not_found)?;
        AuditService::record(&mut *tx, actor_id, action::UPDATE, resource::SITE_SETTING, setting.id)
            .await?;
        tx.commit().await?;

        Ok(setting)
    }

    /// Updates the value under `key`, creating the setting when absent.
    #[instrument(skip(db, value))]
    pub async fn upsert(
        db: &PgPool,
        key: &str,
        value: &str,
        actor_id: i64,
    ) -> Result<SiteSetting, AppError> {
        let mut tx = db.begin().await?;

        let (setting, performed) = match Self::update_value(&mut *tx, key, value).await? {
            Some(setting) => (setting, action::UPDATE),
            None => (Self::insert(&mut *tx, key, value).await?, action::CREATE),
        };

        AuditService::record(&mut *tx, actor_id, performed, resource::SITE_SETTING, setting.id)
            .await?;
        tx.commit().await?;

        Ok(setting)
    }

    #[instrument(skip(db))]
    pub async fn delete(db: &PgPool, key: &str, actor_id: i64) -> Result<(), AppError> {
        let mut tx = db.begin().await?;

        let id = sqlx::query_scalar::<_, i64>("DELETE FROM site_settings WHERE key = $1 RETURNING id")
            .bind(key)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(setting_not_found)?;

        AuditService::record(&mut *tx, actor_id, action::DELETE, resource::SITE_SETTING, id).await?;
        tx.commit().await?;

        Ok(())
    }
}
