use axum::http::{HeaderValue, Method, header};
use axum::{Router, middleware, routing::get};
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable as _};
use utoipa_swagger_ui::SwaggerUi;

use pagecraft_observability::{logging_middleware, metrics_middleware};

use crate::docs::ApiDoc;
use crate::health::{health_check, metrics, root};
use crate::modules::audit_logs::init_audit_logs_router;
use crate::modules::auth::init_auth_router;
use crate::modules::media::init_media_router;
use crate::modules::page_blocks::init_page_blocks_router;
use crate::modules::pages::init_pages_router;
use crate::modules::settings::init_settings_router;
use crate::modules::users::init_users_router;
use crate::state::AppState;

fn cors_layer(state: &AppState) -> CorsLayer {
    let allowed_origins: Vec<HeaderValue> = state
        .cors_config
        .allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .allow_credentials(true)
}

pub fn init_router(state: AppState) -> Router {
    let api = Router::new()
        .nest("/auth", init_auth_router())
        .nest("/users", init_users_router())
        .nest("/pages", init_pages_router())
        .nest("/page-blocks", init_page_blocks_router())
        .nest("/media", init_media_router(&state.media_config))
        .nest("/settings", init_settings_router())
        .nest("/audit-logs", init_audit_logs_router());

    let mut router = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(Scalar::with_url("/scalar", ApiDoc::openapi()))
        .route("/", get(root))
        .route("/health", get(health_check))
        .route("/metrics", get(metrics))
        .nest("/api", api);

    // Absolute URLs point at an external host; only local prefixes are served here.
    let public_url = state.media_config.public_url.trim_end_matches('/');
    if public_url.starts_with('/') && public_url.len() > 1 {
        router = router.nest_service(
            public_url,
            ServeDir::new(&state.media_config.upload_dir),
        );
    }

    router
        .with_state(state.clone())
        .layer(cors_layer(&state))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(logging_middleware))
}
