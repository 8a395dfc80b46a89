use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

use super::controller::{
    confirm_password_reset, get_me, login_user, logout_user, refresh_token, register_user,
    request_password_reset,
};

pub fn init_auth_router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register_user))
        .route("/login", post(login_user))
        .route("/refresh", post(refresh_token))
        .route("/logout", post(logout_user))
        .route("/reset-password/request", post(request_password_reset))
        .route("/reset-password/confirm", post(confirm_password_reset))
        .route("/me", get(get_me))
}
