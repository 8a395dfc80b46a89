use axum::{Router, extract::DefaultBodyLimit, routing::get};

use pagecraft_config::MediaConfig;

use crate::state::AppState;

use super::controller::{delete_media, get_media, get_media_list, upload_media};

// Headroom for multipart boundaries and part headers.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

pub fn init_media_router(config: &MediaConfig) -> Router<AppState> {
    Router::new()
        .route("/", get(get_media_list).post(upload_media))
        .route("/{id}", get(get_media).delete(delete_media))
        .layer(DefaultBodyLimit::max(config.max_bytes + MULTIPART_OVERHEAD))
}
