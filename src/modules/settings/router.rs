use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

use super::controller::{
    create_setting, delete_setting, get_public_settings, get_setting, list_settings,
    update_setting, upsert_setting,
};

pub fn init_settings_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_settings).post(create_setting))
        .route("/public", get(get_public_settings))
        .route("/upsert/{key}", post(upsert_setting))
        .route(
            "/{key}",
            get(get_setting).put(update_setting).delete(delete_setting),
        )
}
