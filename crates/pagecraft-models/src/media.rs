//! Uploaded file metadata.

use chrono::{DateTime, Utc};
use pagecraft_core::PaginationMeta;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Media {
    pub id: i64,
    /// Original file name as uploaded
    pub filename: String,
    #[schema(example = "/static/uploads/2f1c7c8e-0d9a-4d2b-9f0e-4f7b1c2d3e4f.png")]
    pub url: String,
    pub mimetype: String,
    pub filesize_bytes: i64,
    pub uploaded_by_user_id: Option<i64>,
    pub uploaded_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedMediaResponse {
    pub data: Vec<Media>,
    pub meta: PaginationMeta,
}
