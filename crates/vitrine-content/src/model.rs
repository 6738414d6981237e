//! Content entities and list filters
//!
//! Field names are snake_case on the wire and in the fallback files, matching
//! the remote columns.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use vitrine_common::{DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT};

use crate::normalize;

/// Untyped request body as received from a caller.
pub type RawInput = Map<String, Value>;

/// Publication status of a content entry
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentStatus {
    Live,
    #[default]
    Draft,
}

impl ContentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentStatus::Live => "live",
            ContentStatus::Draft => "draft",
        }
    }
}

impl fmt::Display for ContentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status filter for read paths. `All` is never persisted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    Live,
    Draft,
    All,
}

impl StatusFilter {
    /// `all` and `draft` are recognized case-insensitively; anything else reads as `live`.
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_lowercase()).as_deref() {
            Some("all") => StatusFilter::All,
            Some("draft") => StatusFilter::Draft,
            _ => StatusFilter::Live,
        }
    }

    /// The status to filter on, or `None` when every status matches.
    pub fn status(&self) -> Option<ContentStatus> {
        match self {
            StatusFilter::Live => Some(ContentStatus::Live),
            StatusFilter::Draft => Some(ContentStatus::Draft),
            StatusFilter::All => None,
        }
    }

    pub fn matches(&self, status: ContentStatus) -> bool {
        self.status().is_none_or(|wanted| wanted == status)
    }
}

/// A service-scoped blog post
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlogPost {
    pub id: i64,
    /// `None` means a general post, not tied to a service page
    pub service_id: Option<i64>,
    pub title: String,
    pub slug: String,
    pub excerpt: String,
    pub content: String,
    pub cover_image_url: Option<String>,
    pub status: ContentStatus,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// A service-scoped FAQ entry
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaqEntry {
    pub id: i64,
    pub service_id: i64,
    pub question: String,
    pub answer: String,
    pub status: ContentStatus,
    pub display_order: i64,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Validated blog payload for a create operation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlogDraft {
    pub service_id: Option<i64>,
    pub title: String,
    pub slug: String,
    pub excerpt: String,
    pub content: String,
    pub cover_image_url: Option<String>,
    pub status: ContentStatus,
    /// `Some(_)` when the caller supplied `published_at` explicitly
    pub published_at: Option<Option<DateTime<Utc>>>,
}

/// Validated partial blog update.
///
/// Outer `None` leaves a field untouched; `Some(None)` clears a nullable
/// field. For `slug`, `Some(None)` means "derive from the title".
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BlogPatch {
    pub service_id: Option<Option<i64>>,
    pub title: Option<String>,
    pub slug: Option<Option<String>>,
    pub excerpt: Option<Option<String>>,
    pub content: Option<String>,
    pub cover_image_url: Option<Option<String>>,
    pub status: Option<ContentStatus>,
    pub published_at: Option<Option<DateTime<Utc>>>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FaqDraft {
    pub service_id: i64,
    pub question: String,
    pub answer: String,
    pub status: ContentStatus,
    pub display_order: i64,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FaqPatch {
    pub service_id: Option<i64>,
    pub question: Option<String>,
    pub answer: Option<String>,
    pub status: Option<ContentStatus>,
    pub display_order: Option<i64>,
}

/// Filters for a list operation
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListQuery {
    pub status: StatusFilter,
    pub service_id: Option<i64>,
    /// Blog only; ignored for FAQs
    pub slug: Option<String>,
    pub limit: usize,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            status: StatusFilter::Live,
            service_id: None,
            slug: None,
            limit: DEFAULT_LIST_LIMIT,
        }
    }
}

impl ListQuery {
    /// Build a query from raw query-string values.
    ///
    /// Invalid service ids and empty slugs are dropped. The limit defaults to
    /// 120 and is clamped to `1..=200`.
    pub fn from_params(
        status: Option<&str>,
        service_id: Option<&str>,
        slug: Option<&str>,
        limit: Option<&str>,
    ) -> Self {
        let service_id = service_id
            .and_then(|v| normalize::integer(&Value::String(v.to_string())))
            .filter(|id| *id > 0);
        let slug = slug
            .map(normalize::slugify)
            .filter(|slug| !slug.is_empty());

        Self {
            status: StatusFilter::parse(status),
            service_id,
            slug,
            limit: Self::clamp_limit(limit),
        }
    }

    pub fn with_status(mut self, status: StatusFilter) -> Self {
        self.status = status;
        self
    }

    pub fn with_service_id(mut self, service_id: i64) -> Self {
        self.service_id = Some(service_id);
        self
    }

    pub fn with_slug(mut self, slug: &str) -> Self {
        self.slug = Some(slug.to_string());
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit.clamp(1, MAX_LIST_LIMIT);
        self
    }

    fn clamp_limit(limit: Option<&str>) -> usize {
        let parsed = limit
            .and_then(|v| v.trim().parse::<f64>().ok())
            .filter(|v| v.is_finite() && *v != 0.0);

        match parsed {
            Some(v) => v.clamp(1.0, MAX_LIST_LIMIT as f64).floor() as usize,
            None => DEFAULT_LIST_LIMIT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_serialization() {
        assert_eq!(
            serde_json::to_value(ContentStatus::Live).unwrap(),
            Value::String("live".to_string())
        );
        let status: ContentStatus = serde_json::from_str("\"draft\"").unwrap();
        assert_eq!(status, ContentStatus::Draft);
        assert_eq!(ContentStatus::default(), ContentStatus::Draft);
    }

    #[test]
    fn test_status_filter_parse() {
        assert_eq!(StatusFilter::parse(None), StatusFilter::Live);
        assert_eq!(StatusFilter::parse(Some("ALL")), StatusFilter::All);
        assert_eq!(StatusFilter::parse(Some(" draft ")), StatusFilter::Draft);
        assert_eq!(StatusFilter::parse(Some("archived")), StatusFilter::Live);

        assert!(StatusFilter::All.matches(ContentStatus::Draft));
        assert!(!StatusFilter::Live.matches(ContentStatus::Draft));
    }

    #[test]
    fn test_list_query_defaults() {
        let query = ListQuery::from_params(None, None, None, None);
        assert_eq!(query, ListQuery::default());
        assert_eq!(query.limit, 120);
    }

    #[test]
    fn test_list_query_limit_clamping() {
        assert_eq!(ListQuery::from_params(None, None, None, Some("500")).limit, 200);
        assert_eq!(ListQuery::from_params(None, None, None, Some("-3")).limit, 1);
        assert_eq!(ListQuery::from_params(None, None, None, Some("0")).limit, 120);
        assert_eq!(ListQuery::from_params(None, None, None, Some("abc")).limit, 120);
        assert_eq!(ListQuery::from_params(None, None, None, Some("7.9")).limit, 7);
    }

    #[test]
    fn test_list_query_filters() {
        let query = ListQuery::from_params(Some("all"), Some("4"), Some("Hello World"), None);
        assert_eq!(query.status, StatusFilter::All);
        assert_eq!(query.service_id, Some(4));
        assert_eq!(query.slug.as_deref(), Some("hello-world"));

        let query = ListQuery::from_params(None, Some("-1"), Some("!!!"), None);
        assert_eq!(query.service_id, None);
        assert_eq!(query.slug, None);
    }
}
