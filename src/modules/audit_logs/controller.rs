use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use tracing::instrument;

use pagecraft_core::{AppError, PaginationParams};
use pagecraft_models::{AuditLog, AuditLogFilterParams, PaginatedAuditLogsResponse};

use crate::middleware::auth::{RequireAuditDelete, RequireAuditView};
use crate::modules::audit_logs::service::AuditService;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/api/audit-logs",
    params(AuditLogFilterParams, PaginationParams),
    responses(
        (status = 200, description = "Audit entries, newest first", body = PaginatedAuditLogsResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires analytics.view or audit.view")
    ),
    tag = "Audit Logs",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _auth_user))]
pub async fn list_audit_logs(
    State(state): State<AppState>,
    RequireAuditView(_auth_user): RequireAuditView,
    Query(filters): Query<AuditLogFilterParams>,
    Query(pagination): Query<PaginationParams>,
) -> Result<Json<PaginatedAuditLogsResponse>, AppError> {
    let logs = AuditService::list(&state.db, filters, pagination).await?;
    Ok(Json(logs))
}

#[utoipa::path(
    get,
    path = "/api/audit-logs/{id}",
    params(("id" = i64, Path, description = "Audit log ID")),
    responses(
        (status = 200, description = "Audit entry", body = AuditLog),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires analytics.view or audit.view"),
        (status = 404, description = "Audit log not found")
    ),
    tag = "Audit Logs",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _auth_user))]
pub async fn get_audit_log(
    State(state): State<AppState>,
    RequireAuditView(_auth_user): RequireAuditView,
    Path(id): Path<i64>,
) -> Result<Json<AuditLog>, AppError> {
    let log = AuditService::get(&state.db, id).await?;
    Ok(Json(log))
}

#[utoipa::path(
    delete,
    path = "/api/audit-logs/{id}",
    params(("id" = i64, Path, description = "Audit log ID")),
    responses(
        (status = 204, description = "Audit entry deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires audit.delete"),
        (status = 404, description = "Audit log not found")
    ),
    tag = "Audit Logs",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user), fields(actor_id = auth_user.id()))]
pub async fn delete_audit_log(
    State(state): State<AppState>,
    RequireAuditDelete(auth_user): RequireAuditDelete,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    AuditService::delete(&state.db, id, auth_user.id()).await?;
    Ok(StatusCode::NO_CONTENT)
}
