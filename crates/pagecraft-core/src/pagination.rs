//! Pagination for list endpoints.
//!
//! Clients pass `limit` with either `offset` or a 1-indexed `page`; when both
//! are present `page` wins. `limit` is clamped to [1, 100] and defaults to 10.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::serde::deserialize_optional_i64;

/// Metadata attached to every paginated response as `meta`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PaginationMeta {
    /// Total number of items across all pages
    pub total: i64,
    /// Maximum items per page (the limit that was applied)
    pub limit: i64,
    /// Number of items skipped (only present if offset-based pagination was used)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<i64>,
    /// Current page number (only present if page-based pagination was used)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<i64>,
    /// Whether there are more items after this page
    pub has_more: bool,
}

/// Query parameters for pagination.
#[derive(Debug, Clone, Hash, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PaginationParams {
    /// Maximum number of items to return (1-100, default: 10)
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub limit: Option<i64>,
    /// Number of items to skip (default: 0, ignored if `page` is set)
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub offset: Option<i64>,
    /// Page number (1-indexed, default: 1)
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub page: Option<i64>,
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            limit: Some(10),
            offset: Some(0),
            page: Some(1),
        }
    }
}

impl PaginationParams {
    /// Builds the response metadata for a page of results out of `total` rows.
    #[must_use]
    pub fn meta(&self, total: i64) -> PaginationMeta {
        let limit = self.limit();
        let offset = self.offset();
        PaginationMeta {
            total,
            limit,
            offset: Some(offset),
            page: self.page(),
            has_more: offset + limit < total,
        }
    }

    /// Returns the effective limit, clamped to [1, 100].
    ///
    /// Defaults to 10 if not specified.
    #[must_use]
    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(10).clamp(1, 100)
    }

    /// Returns the effective offset.
    ///
    /// If `page` is set, calculates the offset from the page number.
    /// Otherwise, returns the explicit offset or 0.
    ///
    /// The offset is always clamped to a minimum of 0.
    #[must_use]
    pub fn offset(&self) -> i64 {
        if let Some(page) = self.page {
            let page = page.max(1);
            let limit = self.limit();
            (page - 1) * limit
        } else {
            self.offset.unwrap_or(0).max(0)
        }
    }

    /// Returns the page number if provided, clamped to a minimum of 1.
    #[must_use]
    pub fn page(&self) -> Option<i64> {
        self.page.map(|p| p.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_fields_missing() {
        let params: PaginationParams = serde_json::from_str("{}").unwrap();
        assert_eq!(params.limit(), 10);
        assert_eq!(params.offset(), 0);
        assert_eq!(params.page(), None);
    }

    #[test]
    fn empty_query_values_are_ignored() {
        let params: PaginationParams =
            serde_json::from_str(r#"{"limit":"","offset":"","page":""}"#).unwrap();
        assert_eq!(params.limit(), 10);
        assert_eq!(params.offset(), 0);
    }

    #[test]
    fn limit_is_clamped() {
        for (input, expected) in [(Some(0), 1), (Some(-5), 1), (Some(50), 50), (Some(101), 100)] {
            let params = PaginationParams {
                limit: input,
                offset: None,
                page: None,
            };
            assert_eq!(params.limit(), expected);
        }
    }

    #[test]
    fn negative_offset_is_clamped() {
        let params = PaginationParams {
            limit: Some(10),
            offset: Some(-3),
            page: None,
        };
        assert_eq!(params.offset(), 0);
    }

    #[test]
    fn page_takes_precedence_over_offset() {
        let params = PaginationParams {
            limit: Some(20),
            offset: Some(5),
            page: Some(3),
        };
        assert_eq!(params.offset(), 40);
        assert_eq!(params.page(), Some(3));
    }

    #[test]
    fn meta_reports_has_more() {
        let params = PaginationParams {
            limit: Some(10),
            offset: Some(0),
            page: None,
        };
        assert!(params.meta(25).has_more);
        assert!(!params.meta(10).has_more);
        assert_eq!(params.meta(0).total, 0);
    }

    #[test]
    fn meta_omits_unused_fields_when_serialized() {
        let meta = PaginationMeta {
            total: 3,
            limit: 10,
            offset: Some(0),
            page: None,
            has_more: false,
        };
        let json = serde_json::to_string(&meta).unwrap();
        assert!(json.contains(r#""total":3"#));
        assert!(!json.contains("page"));
    }
}
