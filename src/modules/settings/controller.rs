use std::collections::BTreeMap;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use tracing::instrument;
use validator::Validate;

use pagecraft_core::AppError;
use pagecraft_models::{CreateSettingDto, SiteSetting, UpdateSettingDto};

use crate::middleware::auth::{RequireSettingsEdit, RequireSettingsView};
use crate::modules::auth::controller::ErrorResponse;
use crate::modules::settings::service::SettingsService;
use crate::state::AppState;
use crate::validator::{ValidatedJson, validation_error};

#[utoipa::path(
    get,
    path = "/api/settings/public",
    responses(
        (status = 200, description = "All settings as a key/value map", body = BTreeMap<String, String>)
    ),
    tag = "Site Settings"
)]
#[instrument(skip(state))]
pub async fn get_public_settings(
    State(state): State<AppState>,
) -> Result<Json<BTreeMap<String, String>>, AppError> {
    let settings = SettingsService::public_map(&state.db).await?;
    Ok(Json(settings))
}

#[utoipa::path(
    get,
    path = "/api/settings",
    responses(
        (status = 200, description = "Settings ordered by key", body = Vec<SiteSetting>),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - requires settings.view", body = ErrorResponse)
    ),
    tag = "Site Settings",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _auth_user))]
pub async fn list_settings(
    State(state): State<AppState>,
    RequireSettingsView(_auth_user): RequireSettingsView,
) -> Result<Json<Vec<SiteSetting>>, AppError> {
    let settings = SettingsService::list(&state.db).await?;
    Ok(Json(settings))
}

#[utoipa::path(
    get,
    path = "/api/settings/{key}",
    params(("key" = String, Path, description = "Setting key")),
    responses(
        (status = 200, description = "Setting", body = SiteSetting),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - requires settings.view", body = ErrorResponse),
        (status = 404, description = "Setting not found", body = ErrorResponse)
    ),
    tag = "Site Settings",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _auth_user))]
pub async fn get_setting(
    State(state): State<AppState>,
    RequireSettingsView(_auth_user): RequireSettingsView,
    Path(key): Path<String>,
) -> Result<Json<SiteSetting>, AppError> {
    let setting = SettingsService::get(&state.db, &key).await?;
    Ok(Json(setting))
}

#[utoipa::path(
    post,
    path = "/api/settings",
    request_body = CreateSettingDto,
    responses(
        (status = 201, description = "Setting created", body = SiteSetting),
        (status = 400, description = "Key already exists", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - requires settings.edit", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    tag = "Site Settings",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user, dto), fields(actor_id = auth_user.id()))]
pub async fn create_setting(
    State(state): State<AppState>,
    RequireSettingsEdit(auth_user): RequireSettingsEdit,
    ValidatedJson(dto): ValidatedJson<CreateSettingDto>,
) -> Result<(StatusCode, Json<SiteSetting>), AppError> {
    let setting = SettingsService::create(&state.db, dto, auth_user.id()).await?;
    Ok((StatusCode::CREATED, Json(setting)))
}

#[utoipa::path(
    put,
    path = "/api/settings/{key}",
    params(("key" = String, Path, description = "Setting key")),
    request_body = UpdateSettingDto,
    responses(
        (status = 200, description = "Setting updated", body = SiteSetting),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - requires settings.edit", body = ErrorResponse),
        (status = 404, description = "Setting not found", body = ErrorResponse)
    ),
    tag = "Site Settings",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user, dto), fields(actor_id = auth_user.id()))]
pub async fn update_setting(
    State(state): State<AppState>,
    RequireSettingsEdit(auth_user): RequireSettingsEdit,
    Path(key): Path<String>,
    ValidatedJson(dto): ValidatedJson<UpdateSettingDto>,
) -> Result<Json<SiteSetting>, AppError> {
    let setting = SettingsService::update(&state.db, &key, &dto.value, auth_user.id()).await?;
    Ok(Json(setting))
}

#[utoipa::path(
    post,
    path = "/api/settings/upsert/{key}",
    params(("key" = String, Path, description = "Setting key")),
    request_body = UpdateSettingDto,
    responses(
        (status = 200, description = "Setting created or updated", body = SiteSetting),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - requires settings.edit", body = ErrorResponse),
        (status = 422, description = "Invalid key", body = ErrorResponse)
    ),
    tag = "Site Settings",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user, dto), fields(actor_id = auth_user.id()))]
pub async fn upsert_setting(
    State(state): State<AppState>,
    RequireSettingsEdit(auth_user): RequireSettingsEdit,
    Path(key): Path<String>,
    ValidatedJson(dto): ValidatedJson<UpdateSettingDto>,
) -> Result<Json<SiteSetting>, AppError> {
    // Path keys follow the same rules as keys in a create body.
    let candidate = CreateSettingDto {
        key,
        value: dto.value,
    };
    candidate
        .validate()
        .map_err(|errors| validation_error(&errors))?;

    let setting =
        SettingsService::upsert(&state.db, &candidate.key, &candidate.value, auth_user.id())
            .await?;
    Ok(Json(setting))
}

#[utoipa::path(
    delete,
    path = "/api/settings/{key}",
    params(("key" = String, Path, description = "Setting key")),
    responses(
        (status = 204, description = "Setting deleted"),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - requires settings.edit", body = ErrorResponse),
        (status = 404, description = "Setting not found", body = ErrorResponse)
    ),
    tag = "Site Settings",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user), fields(actor_id = auth_user.id()))]
pub async fn delete_setting(
    State(state): State<AppState>,
    RequireSettingsEdit(auth_user): RequireSettingsEdit,
    Path(key): Path<String>,
) -> Result<StatusCode, AppError> {
    SettingsService::delete(&state.db, &key, auth_user.id()).await?;
    Ok(StatusCode::NO_CONTENT)
}
