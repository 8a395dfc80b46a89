use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use tracing::instrument;

use pagecraft_core::{AppError, PaginationParams};
use pagecraft_models::{
    CreatePageBlockDto, PageBlock, PageBlockFilterParams, PaginatedPageBlocksResponse,
    UpdatePageBlockDto,
};

use crate::middleware::auth::{
    RequireContentCreate, RequireContentDelete, RequireContentEdit, RequireContentView,
};
use crate::modules::auth::controller::ErrorResponse;
use crate::modules::page_blocks::service::PageBlockService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

#[utoipa::path(
    get,
    path = "/api/page-blocks",
    params(PageBlockFilterParams, PaginationParams),
    responses(
        (status = 200, description = "Paginated blocks", body = PaginatedPageBlocksResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - requires content.view", body = ErrorResponse)
    ),
    tag = "Page Blocks",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _auth_user))]
pub async fn get_page_blocks(
    State(state): State<AppState>,
    RequireContentView(_auth_user): RequireContentView,
    Query(filters): Query<PageBlockFilterParams>,
    Query(pagination): Query<PaginationParams>,
) -> Result<Json<PaginatedPageBlocksResponse>, AppError> {
    let blocks = PageBlockService::list(&state.db, filters, pagination).await?;
    Ok(Json(blocks))
}

#[utoipa::path(
    get,
    path = "/api/page-blocks/{id}",
    params(("id" = i64, Path, description = "Block ID")),
    responses(
        (status = 200, description = "Block", body = PageBlock),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - requires content.view", body = ErrorResponse),
        (status = 404, description = "Page block not found", body = ErrorResponse)
    ),
    tag = "Page Blocks",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _auth_user))]
pub async fn get_page_block(
    State(state): State<AppState>,
    RequireContentView(_auth_user): RequireContentView,
    Path(id): Path<i64>,
) -> Result<Json<PageBlock>, AppError> {
    let block = PageBlockService::get(&state.db, id).await?;
    Ok(Json(block))
}

#[utoipa::path(
    post,
    path = "/api/page-blocks",
    request_body = CreatePageBlockDto,
    responses(
        (status = 201, description = "Block created", body = PageBlock),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - requires content.create", body = ErrorResponse),
        (status = 404, description = "Page not found", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    tag = "Page Blocks",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user, dto), fields(actor_id = auth_user.id()))]
pub async fn create_page_block(
    State(state): State<AppState>,
    RequireContentCreate(auth_user): RequireContentCreate,
    ValidatedJson(dto): ValidatedJson<CreatePageBlockDto>,
) -> Result<(StatusCode, Json<PageBlock>), AppError> {
    let block = PageBlockService::create(&state.db, dto, auth_user.id()).await?;
    Ok((StatusCode::CREATED, Json(block)))
}

#[utoipa::path(
    put,
    path = "/api/page-blocks/{id}",
    params(("id" = i64, Path, description = "Block ID")),
    request_body = UpdatePageBlockDto,
    responses(
        (status = 200, description = "Block updated", body = PageBlock),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - requires content.edit", body = ErrorResponse),
        (status = 404, description = "Page block not found", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    tag = "Page Blocks",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user, dto), fields(actor_id = auth_user.id()))]
pub async fn update_page_block(
    State(state): State<AppState>,
    RequireContentEdit(auth_user): RequireContentEdit,
    Path(id): Path<i64>,
    ValidatedJson(dto): ValidatedJson<UpdatePageBlockDto>,
) -> Result<Json<PageBlock>, AppError> {
    let block = PageBlockService::update(&state.db, id, dto, auth_user.id()).await?;
    Ok(Json(block))
}

#[utoipa::path(
    delete,
    path = "/api/page-blocks/{id}",
    params(("id" = i64, Path, description = "Block ID")),
    responses(
        (status = 204, description = "Block deleted"),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - requires content.delete", body = ErrorResponse),
        (status = 404, description = "Page block not found", body = ErrorResponse)
    ),
    tag = "Page Blocks",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user), fields(actor_id = auth_user.id()))]
pub async fn delete_page_block(
    State(state): State<AppState>,
    RequireContentDelete(auth_user): RequireContentDelete,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    PageBlockService::delete(&state.db, id, auth_user.id()).await?;
    Ok(StatusCode::NO_CONTENT)
}
