use axum::{
    Json,
    extract::{Multipart, Path, Query, State, multipart::MultipartError},
    http::StatusCode,
};
use tracing::instrument;
use utoipa::ToSchema;

use pagecraft_core::{AppError, PaginationParams};
use pagecraft_models::{Media, PaginatedMediaResponse};

use crate::middleware::auth::{RequireMediaDelete, RequireMediaUpload, RequireMediaView};
use crate::modules::auth::controller::ErrorResponse;
use crate::modules::media::service::{MediaService, Upload};
use crate::state::AppState;

const FILE_FIELD: &str = "file";
const FALLBACK_MIME: &str = "application/octet-stream";
const MAX_FILENAME_BYTES: usize = 255;

/// Multipart body of an upload.
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct MediaUploadForm {
    #[schema(value_type = String, format = Binary)]
    pub file: Vec<u8>,
}

fn multipart_error(context: &str, err: MultipartError) -> AppError {
    AppError::new(err.status(), anyhow::anyhow!("{context}: {}", err.body_text()))
}

/// Pulls the `file` part out of the form; other parts are ignored.
async fn read_upload(mut multipart: Multipart) -> Result<Upload, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error("Invalid multipart body", e))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let filename = field
            .file_name()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or("upload")
            .to_string();
        if filename.len() > MAX_FILENAME_BYTES {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "filename must be at most {MAX_FILENAME_BYTES} bytes"
            )));
        }
        let mimetype = field.content_type().unwrap_or(FALLBACK_MIME).to_string();
        let content = field
            .bytes()
            .await
            .map_err(|e| multipart_error("Failed to read upload", e))?
            .to_vec();

        return Ok(Upload {
            filename,
            mimetype,
            content,
        });
    }

    Err(AppError::bad_request(anyhow::anyhow!("file is required")))
}

#[utoipa::path(
    post,
    path = "/api/media",
    request_body(content = MediaUploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "File uploaded", body = Media),
        (status = 400, description = "Missing file field or filename too long", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - requires media.upload", body = ErrorResponse),
        (status = 413, description = "File too large", body = ErrorResponse),
        (status = 415, description = "File type not allowed", body = ErrorResponse)
    ),
    tag = "Media",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user, multipart), fields(actor_id = auth_user.id()))]
pub async fn upload_media(
    State(state): State<AppState>,
    RequireMediaUpload(auth_user): RequireMediaUpload,
    multipart: Multipart,
) -> Result<(StatusCode, Json<Media>), AppError> {
    let upload = read_upload(multipart).await?;
    let media =
        MediaService::upload(&state.db, state.storage.as_ref(), upload, auth_user.id()).await?;
    Ok((StatusCode::CREATED, Json(media)))
}

#[utoipa::path(
    get,
    path = "/api/media",
    params(PaginationParams),
    responses(
        (status = 200, description = "Paginated media, newest first", body = PaginatedMediaResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - requires media.view", body = ErrorResponse)
    ),
    tag = "Media",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _auth_user))]
pub async fn get_media_list(
    State(state): State<AppState>,
    RequireMediaView(_auth_user): RequireMediaView,
    Query(pagination): Query<PaginationParams>,
) -> Result<Json<PaginatedMediaResponse>, AppError> {
    let media = MediaService::list(&state.db, pagination).await?;
    Ok(Json(media))
}

#[utoipa::path(
    get,
    path = "/api/media/{id}",
    params(("id" = i64, Path, description = "Media ID")),
    responses(
        (status = 200, description = "Media record", body = Media),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - requires media.view", body = ErrorResponse),
        (status = 404, description = "Media not found", body = ErrorResponse)
    ),
    tag = "Media",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _auth_user))]
pub async fn get_media(
    State(state): State<AppState>,
    RequireMediaView(_auth_user): RequireMediaView,
    Path(id): Path<i64>,
) -> Result<Json<Media>, AppError> {
    let media = MediaService::get(&state.db, id).await?;
    Ok(Json(media))
}

#[utoipa::path(
    delete,
    path = "/api/media/{id}",
    params(("id" = i64, Path, description = "Media ID")),
    responses(
        (status = 204, description = "Media deleted"),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - requires media.delete", body = ErrorResponse),
        (status = 404, description = "Media not found", body = ErrorResponse)
    ),
    tag = "Media",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user), fields(actor_id = auth_user.id()))]
pub async fn delete_media(
    State(state): State<AppState>,
    RequireMediaDelete(auth_user): RequireMediaDelete,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    MediaService::delete(&state.db, state.storage.as_ref(), id, auth_user.id()).await?;
    Ok(StatusCode::NO_CONTENT)
}
