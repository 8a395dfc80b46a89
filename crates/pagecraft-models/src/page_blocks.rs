//! Content blocks rendered on a page.

use chrono::{DateTime, Utc};
use pagecraft_core::PaginationMeta;
use pagecraft_core::serde::deserialize_optional_i64;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct PageBlock {
    pub id: i64,
    pub page_id: i64,
    /// e.g. `text`, `image`, `hero`, `gallery`
    #[serde(rename = "type")]
    pub block_type: String,
    #[schema(value_type = Object)]
    pub content: serde_json::Value,
    #[serde(rename = "order")]
    pub sort_order: i32,
    pub is_visible: bool,
    pub created_by_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreatePageBlockDto {
    pub page_id: i64,
    #[serde(rename = "type")]
    #[validate(length(min = 1, max = 50))]
    pub block_type: String,
    #[schema(value_type = Object)]
    #[validate(custom(function = "crate::validation::validate_json_object"))]
    pub content: serde_json::Value,
    #[serde(rename = "order", default)]
    pub sort_order: i32,
    #[serde(default = "default_visible")]
    pub is_visible: bool,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdatePageBlockDto {
    #[serde(rename = "type")]
    #[validate(length(min = 1, max = 50))]
    pub block_type: Option<String>,
    #[schema(value_type = Option<Object>)]
    #[validate(custom(function = "crate::validation::validate_json_object"))]
    pub content: Option<serde_json::Value>,
    #[serde(rename = "order")]
    pub sort_order: Option<i32>,
    pub is_visible: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageBlockFilterParams {
    /// Only blocks on this page, in display order
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub page_id: Option<i64>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedPageBlocksResponse {
    pub data: Vec<PageBlock>,
    pub meta: PaginationMeta,
}

fn default_visible() -> bool {
    true
}
