use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use tracing::instrument;

use pagecraft_core::permissions;
use pagecraft_core::{AppError, PaginationParams};
use pagecraft_models::{
    CreatePageDto, CreateRevisionDto, Page, PageFilterParams, PageRevision, PageWithBlocks,
    PaginatedPagesResponse, UpdatePageDto,
};

use crate::middleware::auth::{
    RequireContentCreate, RequireContentDelete, RequireContentEdit, RequireContentRevise,
    RequireContentView,
};
use crate::modules::auth::controller::ErrorResponse;
use crate::modules::pages::service::PageService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

#[utoipa::path(
    get,
    path = "/api/pages",
    params(PageFilterParams, PaginationParams),
    responses(
        (status = 200, description = "Paginated pages, newest first", body = PaginatedPagesResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - requires content.view", body = ErrorResponse)
    ),
    tag = "Pages",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _auth_user))]
pub async fn get_pages(
    State(state): State<AppState>,
    RequireContentView(_auth_user): RequireContentView,
    Query(filters): Query<PageFilterParams>,
    Query(pagination): Query<PaginationParams>,
) -> Result<Json<PaginatedPagesResponse>, AppError> {
    let pages = PageService::list(&state.db, filters, pagination).await?;
    Ok(Json(pages))
}

#[utoipa::path(
    get,
    path = "/api/pages/{id}",
    params(("id" = i64, Path, description = "Page ID")),
    responses(
        (status = 200, description = "Page with its blocks", body = PageWithBlocks),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - requires content.view", body = ErrorResponse),
        (status = 404, description = "Page not found", body = ErrorResponse)
    ),
    tag = "Pages",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _auth_user))]
pub async fn get_page(
    State(state): State<AppState>,
    RequireContentView(_auth_user): RequireContentView,
    Path(id): Path<i64>,
) -> Result<Json<PageWithBlocks>, AppError> {
    let page = PageService::get_with_blocks(&state.db, id).await?;
    Ok(Json(page))
}

#[utoipa::path(
    get,
    path = "/api/pages/slug/{slug}",
    params(("slug" = String, Path, description = "Page slug")),
    responses(
        (status = 200, description = "Page with its blocks", body = PageWithBlocks),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - requires content.view", body = ErrorResponse),
        (status = 404, description = "Page not found", body = ErrorResponse)
    ),
    tag = "Pages",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _auth_user))]
pub async fn get_page_by_slug(
    State(state): State<AppState>,
    RequireContentView(_auth_user): RequireContentView,
    Path(slug): Path<String>,
) -> Result<Json<PageWithBlocks>, AppError> {
    let page = PageService::get_by_slug(&state.db, &slug).await?;
    Ok(Json(page))
}

/// Create a page. Creating it already published also requires `content.publish`.
#[utoipa::path(
    post,
    path = "/api/pages",
    request_body = CreatePageDto,
    responses(
        (status = 201, description = "Page created", body = Page),
        (status = 400, description = "Slug already in use", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - requires content.create", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    tag = "Pages",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user, dto), fields(actor_id = auth_user.id()))]
pub async fn create_page(
    State(state): State<AppState>,
    RequireContentCreate(auth_user): RequireContentCreate,
    ValidatedJson(dto): ValidatedJson<CreatePageDto>,
) -> Result<(StatusCode, Json<Page>), AppError> {
    if dto.is_published {
        auth_user.require(&state.permissions, &[permissions::CONTENT_PUBLISH])?;
    }

    let page = PageService::create(&state.db, dto, auth_user.id()).await?;
    Ok((StatusCode::CREATED, Json(page)))
}

/// Update a page. Changing `is_published` also requires `content.publish`.
#[utoipa::path(
    put,
    path = "/api/pages/{id}",
    params(("id" = i64, Path, description = "Page ID")),
    request_body = UpdatePageDto,
    responses(
        (status = 200, description = "Page updated", body = Page),
        (status = 400, description = "Slug already in use", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - requires content.edit", body = ErrorResponse),
        (status = 404, description = "Page not found", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    tag = "Pages",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user, dto), fields(actor_id = auth_user.id()))]
pub async fn update_page(
    State(state): State<AppState>,
    RequireContentEdit(auth_user): RequireContentEdit,
    Path(id): Path<i64>,
    ValidatedJson(dto): ValidatedJson<UpdatePageDto>,
) -> Result<Json<Page>, AppError> {
    if let Some(is_published) = dto.is_published {
        let current = PageService::get_page(&state.db, id).await?;
        if current.is_published != is_published {
            auth_user.require(&state.permissions, &[permissions::CONTENT_PUBLISH])?;
        }
    }

    let page = PageService::update(&state.db, id, dto, auth_user.id()).await?;
    Ok(Json(page))
}

#[utoipa::path(
    delete,
    path = "/api/pages/{id}",
    params(("id" = i64, Path, description = "Page ID")),
    responses(
        (status = 204, description = "Page and its blocks and revisions deleted"),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - requires content.delete", body = ErrorResponse),
        (status = 404, description = "Page not found", body = ErrorResponse)
    ),
    tag = "Pages",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user), fields(actor_id = auth_user.id()))]
pub async fn delete_page(
    State(state): State<AppState>,
    RequireContentDelete(auth_user): RequireContentDelete,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    PageService::delete(&state.db, id, auth_user.id()).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/pages/{id}/revisions",
    params(("id" = i64, Path, description = "Page ID")),
    responses(
        (status = 200, description = "Revisions, newest first", body = Vec<PageRevision>),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - requires content.view", body = ErrorResponse),
        (status = 404, description = "Page not found", body = ErrorResponse)
    ),
    tag = "Pages",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _auth_user))]
pub async fn get_revisions(
    State(state): State<AppState>,
    RequireContentView(_auth_user): RequireContentView,
    Path(id): Path<i64>,
) -> Result<Json<Vec<PageRevision>>, AppError> {
    let revisions = PageService::list_revisions(&state.db, id).await?;
    Ok(Json(revisions))
}

#[utoipa::path(
    post,
    path = "/api/pages/{id}/revisions",
    params(("id" = i64, Path, description = "Page ID")),
    request_body = CreateRevisionDto,
    responses(
        (status = 201, description = "Revision saved", body = PageRevision),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - requires content.revise", body = ErrorResponse),
        (status = 404, description = "Page not found", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    tag = "Pages",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user, dto), fields(actor_id = auth_user.id()))]
pub async fn create_revision(
    State(state): State<AppState>,
    RequireContentRevise(auth_user): RequireContentRevise,
    Path(id): Path<i64>,
    ValidatedJson(dto): ValidatedJson<CreateRevisionDto>,
) -> Result<(StatusCode, Json<PageRevision>), AppError> {
    let revision = PageService::create_revision(&state.db, id, dto, auth_user.id()).await?;
    Ok((StatusCode::CREATED, Json(revision)))
}
