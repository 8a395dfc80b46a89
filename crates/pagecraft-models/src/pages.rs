//! Pages and their revision history.

use std::fmt;

use chrono::{DateTime, Utc};
use pagecraft_core::PaginationMeta;
use pagecraft_core::serde::deserialize_optional_bool;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::page_blocks::PageBlock;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Page {
    pub id: i64,
    #[schema(example = "about-us")]
    pub slug: String,
    pub title: String,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A page with its blocks in display order.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PageWithBlocks {
    #[serde(flatten)]
    pub page: Page,
    pub blocks: Vec<PageBlock>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreatePageDto {
    #[validate(
        length(min = 1, max = 100),
        custom(function = "crate::validation::validate_slug")
    )]
    pub slug: String,
    #[validate(length(min = 1, max = 255))]
    pub title: String,
    #[serde(default)]
    pub is_published: bool,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdatePageDto {
    #[validate(
        length(min = 1, max = 100),
        custom(function = "crate::validation::validate_slug")
    )]
    pub slug: Option<String>,
    #[validate(length(min = 1, max = 255))]
    pub title: Option<String>,
    pub is_published: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageFilterParams {
    #[serde(default, deserialize_with = "deserialize_optional_bool")]
    pub is_published: Option<bool>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedPagesResponse {
    pub data: Vec<Page>,
    pub meta: PaginationMeta,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum RevisionStatus {
    #[default]
    Draft,
    Published,
    Archived,
}

impl RevisionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RevisionStatus::Draft => "draft",
            RevisionStatus::Published => "published",
            RevisionStatus::Archived => "archived",
        }
    }
}

impl fmt::Display for RevisionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct PageRevision {
    pub id: i64,
    pub page_id: i64,
    pub content: String,
    /// One of `draft`, `published`, `archived`
    pub status: String,
    pub created_by_user_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateRevisionDto {
    #[validate(length(min = 1))]
    pub content: String,
    #[serde(default)]
    pub status: RevisionStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_page_rejects_bad_slug() {
        let dto = CreatePageDto {
            slug: "About Us".into(),
            title: "About".into(),
            is_published: false,
        };
        assert!(dto.validate().unwrap_err().field_errors().contains_key("slug"));
    }

    #[test]
    fn update_page_checks_slug_only_when_present() {
        assert!(UpdatePageDto::default().validate().is_ok());
        let dto = UpdatePageDto {
            slug: Some("UPPER".into()),
            ..Default::default()
        };
        assert!(dto.validate().is_err());
    }

    #[test]
    fn revision_status_parses_lowercase_and_defaults_to_draft() {
        let dto: CreateRevisionDto = serde_json::from_str(r#"{"content":"hello"}"#).unwrap();
        assert_eq!(dto.status, RevisionStatus::Draft);
        let dto: CreateRevisionDto =
            serde_json::from_str(r#"{"content":"hello","status":"archived"}"#).unwrap();
        assert_eq!(dto.status.as_str(), "archived");
        assert!(
            serde_json::from_str::<CreateRevisionDto>(r#"{"content":"x","status":"deleted"}"#)
                .is_err()
        );
    }
}
