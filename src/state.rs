use std::sync::Arc;

use sqlx::PgPool;

use pagecraft_auth::{PermissionRegistry, TokenService};
use pagecraft_config::{CorsConfig, JwtConfig, MediaConfig};
use pagecraft_core::file_storage::{FileStorage, LocalFileStorage};
use pagecraft_db::init_db_pool;
use pagecraft_observability::PrometheusHandle;

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub jwt_config: JwtConfig,
    pub cors_config: CorsConfig,
    pub media_config: MediaConfig,
    pub tokens: Arc<TokenService>,
    pub permissions: Arc<PermissionRegistry>,
    pub storage: Arc<dyn FileStorage>,
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    pub fn new(
        db: PgPool,
        jwt_config: JwtConfig,
        cors_config: CorsConfig,
        media_config: MediaConfig,
    ) -> Self {
        let storage = LocalFileStorage::with_limits(
            media_config.upload_dir.clone(),
            media_config.public_url.clone(),
            media_config.max_bytes,
            media_config.allowed_types.clone(),
        );

        Self {
            db,
            tokens: Arc::new(TokenService::new(&jwt_config)),
            permissions: Arc::new(PermissionRegistry::new()),
            storage: Arc::new(storage),
            jwt_config,
            cors_config,
            media_config,
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, handle: Option<PrometheusHandle>) -> Self {
        self.metrics = handle;
        self
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("jwt_config", &"<redacted>")
            .field("cors_config", &self.cors_config)
            .field("media_config", &self.media_config)
            .field("tokens", &self.tokens)
            .finish_non_exhaustive()
    }
}

pub async fn init_app_state() -> anyhow::Result<AppState> {
    let db = init_db_pool().await?;
    let jwt_config = JwtConfig::from_env()?;

    Ok(AppState::new(
        db,
        jwt_config,
        CorsConfig::from_env(),
        MediaConfig::from_env(),
    ))
}
