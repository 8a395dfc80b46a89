use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use tracing::instrument;

use pagecraft_core::permissions;
use pagecraft_core::{AppError, PaginationParams};
use pagecraft_models::{
    CreateUserDto, PaginatedUsersResponse, UpdateUserDto, UserFilterParams, UserResponse,
};

use crate::middleware::auth::{
    RequireUsersCreate, RequireUsersDelete, RequireUsersEdit, RequireUsersView,
};
use crate::modules::auth::controller::ErrorResponse;
use crate::modules::users::service::UserService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

/// List users
#[utoipa::path(
    get,
    path = "/api/users",
    params(UserFilterParams, PaginationParams),
    responses(
        (status = 200, description = "Paginated users", body = PaginatedUsersResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - requires users.view", body = ErrorResponse)
    ),
    tag = "Users",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _auth_user))]
pub async fn get_users(
    State(state): State<AppState>,
    RequireUsersView(_auth_user): RequireUsersView,
    Query(filters): Query<UserFilterParams>,
    Query(pagination): Query<PaginationParams>,
) -> Result<Json<PaginatedUsersResponse>, AppError> {
    let users = UserService::list(&state.db, filters, pagination).await?;
    Ok(Json(users))
}

#[utoipa::path(
    get,
    path = "/api/users/{id}",
    params(("id" = i64, Path, description = "User ID")),
    responses(
        (status = 200, description = "User", body = UserResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - requires users.view", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    tag = "Users",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _auth_user))]
pub async fn get_user(
    State(state): State<AppState>,
    RequireUsersView(_auth_user): RequireUsersView,
    Path(id): Path<i64>,
) -> Result<Json<UserResponse>, AppError> {
    let user = UserService::get_by_id(&state.db, id).await?;
    Ok(Json(user.into()))
}

/// Create a user with any role
#[utoipa::path(
    post,
    path = "/api/users",
    request_body = CreateUserDto,
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 400, description = "Email already registered", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - requires users.create", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    tag = "Users",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user, dto), fields(actor_id = auth_user.id()))]
pub async fn create_user(
    State(state): State<AppState>,
    RequireUsersCreate(auth_user): RequireUsersCreate,
    ValidatedJson(dto): ValidatedJson<CreateUserDto>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    let user = UserService::create(&state.db, dto, auth_user.id()).await?;
    Ok((StatusCode::CREATED, Json(user.into())))
}

/// Update a user. Changing the role also requires `users.manage_roles`.
#[utoipa::path(
    put,
    path = "/api/users/{id}",
    params(("id" = i64, Path, description = "User ID")),
    request_body = UpdateUserDto,
    responses(
        (status = 200, description = "User updated", body = UserResponse),
        (status = 400, description = "Email already registered", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - requires users.edit", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    tag = "Users",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user, dto), fields(actor_id = auth_user.id()))]
pub async fn update_user(
    State(state): State<AppState>,
    RequireUsersEdit(auth_user): RequireUsersEdit,
    Path(id): Path<i64>,
    ValidatedJson(dto): ValidatedJson<UpdateUserDto>,
) -> Result<Json<UserResponse>, AppError> {
    if let Some(role) = dto.role {
        let current = UserService::get_by_id(&state.db, id).await?;
        if current.role != role {
            auth_user.require(&state.permissions, &[permissions::USERS_MANAGE_ROLES])?;
        }
    }

    let user = UserService::update(&state.db, id, dto, auth_user.id()).await?;
    Ok(Json(user.into()))
}

#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    params(("id" = i64, Path, description = "User ID")),
    responses(
        (status = 204, description = "User deleted"),
        (status = 400, description = "Cannot delete yourself", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - requires users.delete", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    tag = "Users",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user), fields(actor_id = auth_user.id()))]
pub async fn delete_user(
    State(state): State<AppState>,
    RequireUsersDelete(auth_user): RequireUsersDelete,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    UserService::delete(&state.db, id, auth_user.id()).await?;
    Ok(StatusCode::NO_CONTENT)
}
