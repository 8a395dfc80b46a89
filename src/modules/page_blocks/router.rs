use axum::{Router, routing::get};

use crate::state::AppState;

use super::controller::{
    create_page_block, delete_page_block, get_page_block, get_page_blocks, update_page_block,
};

pub fn init_page_blocks_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_page_blocks).post(create_page_block))
        .route(
            "/{id}",
            get(get_page_block)
                .put(update_page_block)
                .delete(delete_page_block),
        )
}
