use axum::{Router, routing::get};

use crate::state::AppState;

use super::controller::{
    create_page, create_revision, delete_page, get_page, get_page_by_slug, get_pages,
    get_revisions, update_page,
};

pub fn init_pages_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_pages).post(create_page))
        .route("/slug/{slug}", get(get_page_by_slug))
        .route("/{id}", get(get_page).put(update_page).delete(delete_page))
        .route("/{id}/revisions", get(get_revisions).post(create_revision))
}
