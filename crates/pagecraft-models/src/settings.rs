//! Site-wide key/value settings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct SiteSetting {
    pub id: i64,
    #[schema(example = "site.title")]
    pub key: String,
    pub value: String,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateSettingDto {
    #[validate(
        length(min = 1, max = 100),
        custom(function = "crate::validation::validate_setting_key")
    )]
    pub key: String,
    pub value: String,
}

/// Body of both `PUT /settings/{key}` and `POST /settings/upsert/{key}`.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateSettingDto {
    pub value: String,
}
