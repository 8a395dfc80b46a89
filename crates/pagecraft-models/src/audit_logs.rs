//! The audit trail. Rows are written by the audit recorder only and are
//! never updated.

use chrono::{DateTime, Utc};
use pagecraft_core::PaginationMeta;
use pagecraft_core::serde::{deserialize_optional_i64, deserialize_optional_string};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct AuditLog {
    pub id: i64,
    /// Acting user
    pub user_id: i64,
    #[schema(example = "update")]
    pub action: String,
    #[schema(example = "page")]
    pub resource_type: String,
    pub resource_id: i64,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AuditLogFilterParams {
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub user_id: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub resource_type: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub resource_id: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub action: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedAuditLogsResponse {
    pub data: Vec<AuditLog>,
    pub meta: PaginationMeta,
}
