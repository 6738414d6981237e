//! Blog post descriptor

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::warn;
use vitrine_client::RestQuery;
use vitrine_common::{BLOG_COLLECTION, BLOG_FALLBACK_FILE, VitrineError, error::Result};

use super::{ContentKind, has, newest_first};
use crate::identity::{build_excerpt, resolve_slug};
use crate::model::{BlogDraft, BlogPatch, BlogPost, ContentStatus, ListQuery, RawInput};
use crate::normalize::{self, EXCERPT_MAX_CHARS, TITLE_MAX_CHARS};

pub struct BlogKind;

impl ContentKind for BlogKind {
    type Entry = BlogPost;
    type Draft = BlogDraft;
    type Patch = BlogPatch;

    const COLLECTION: &'static str = BLOG_COLLECTION;
    const FALLBACK_FILE: &'static str = BLOG_FALLBACK_FILE;
    const COLUMNS: &'static str = "id,service_id,title,slug,excerpt,content,cover_image_url,status,published_at,created_at,updated_at";
    const ORDER: &'static str = "published_at.desc.nullslast,created_at.desc";

    const INVALID_ID: &'static str = "Invalid blog id";
    const NOT_FOUND: &'static str = "Blog post not found";
    const CONFLICT: &'static str = "Blog slug already exists";

    fn parse_create(input: &RawInput) -> Result<BlogDraft> {
        let title = required_title(input)?;
        let content = required_content(input)?;
        let service_id = service_id(input)?;
        let slug = resolve_slug(
            normalize::optional_text(input.get("slug")).as_deref(),
            &title,
        );
        let excerpt = build_excerpt(explicit_excerpt(input), &content);
        let status = status(input)?;
        let published_at = if has(input, "published_at") {
            Some(published_at(input)?)
        } else {
            None
        };

        Ok(BlogDraft {
            service_id,
            title,
            slug,
            excerpt,
            content,
            cover_image_url: cover_image_url(input),
            status,
            published_at,
        })
    }

    fn parse_patch(input: &RawInput) -> Result<BlogPatch> {
        let mut patch = BlogPatch::default();

        if has(input, "title") {
            patch.title = Some(required_title(input)?);
        }
        if has(input, "content") {
            patch.content = Some(required_content(input)?);
        }
        if has(input, "service_id") {
            patch.service_id = Some(service_id(input)?);
        }
        if has(input, "slug") {
            patch.slug = Some(
                normalize::optional_text(input.get("slug"))
                    .map(|s| normalize::slugify(&s))
                    .filter(|s| !s.is_empty()),
            );
        }
        if has(input, "excerpt") {
            patch.excerpt = Some(explicit_excerpt(input));
        }
        if has(input, "cover_image_url") {
            patch.cover_image_url = Some(cover_image_url(input));
        }
        if has(input, "status") {
            patch.status = Some(status(input)?);
        }
        if has(input, "published_at") {
            patch.published_at = Some(published_at(input)?);
        }

        Ok(patch)
    }

    fn new_entry(draft: &BlogDraft, id: i64, now: DateTime<Utc>) -> BlogPost {
        let published_at = match draft.published_at {
            Some(explicit) => explicit,
            None => (draft.status == ContentStatus::Live).then_some(now),
        };

        BlogPost {
            id,
            service_id: draft.service_id,
            title: draft.title.clone(),
            slug: draft.slug.clone(),
            excerpt: draft.excerpt.clone(),
            content: draft.content.clone(),
            cover_image_url: draft.cover_image_url.clone(),
            status: draft.status,
            published_at,
            created_at: Some(now),
            updated_at: Some(now),
        }
    }

    fn apply_patch(existing: &BlogPost, patch: &BlogPatch, now: DateTime<Utc>) -> BlogPost {
        let title = patch.title.clone().unwrap_or_else(|| existing.title.clone());
        let content = patch
            .content
            .clone()
            .unwrap_or_else(|| existing.content.clone());

        // a retitled post follows its title unless a slug was given
        let slug = match &patch.slug {
            Some(Some(slug)) => slug.clone(),
            Some(None) => resolve_slug(None, &title),
            None if patch.title.is_some() => resolve_slug(None, &title),
            None => existing.slug.clone(),
        };

        let excerpt = if patch.excerpt.is_some() || patch.content.is_some() {
            build_excerpt(patch.excerpt.clone().flatten(), &content)
        } else {
            existing.excerpt.clone()
        };

        let status = patch.status.unwrap_or(existing.status);
        let published_at = match patch.published_at {
            Some(explicit) => explicit,
            None if patch.status == Some(ContentStatus::Live) && existing.published_at.is_none() => {
                Some(now)
            }
            None => existing.published_at,
        };

        BlogPost {
            id: existing.id,
            service_id: patch.service_id.unwrap_or(existing.service_id),
            title,
            slug,
            excerpt,
            content,
            cover_image_url: patch
                .cover_image_url
                .clone()
                .unwrap_or_else(|| existing.cover_image_url.clone()),
            status,
            published_at,
            created_at: existing.created_at,
            updated_at: Some(now),
        }
    }

    fn id(entry: &BlogPost) -> i64 {
        entry.id
    }

    fn conflicts(a: &BlogPost, b: &BlogPost) -> bool {
        a.slug == b.slug
    }

    fn compare(a: &BlogPost, b: &BlogPost) -> Ordering {
        newest_first(a.published_at, b.published_at)
            .then_with(|| newest_first(a.created_at, b.created_at))
            .then_with(|| b.id.cmp(&a.id))
    }

    fn matches(entry: &BlogPost, query: &ListQuery) -> bool {
        query.status.matches(entry.status)
            && query.service_id.is_none_or(|id| entry.service_id == Some(id))
            && query.slug.as_ref().is_none_or(|slug| &entry.slug == slug)
    }

    fn push_filters(query: &ListQuery, mut rest: RestQuery) -> RestQuery {
        if let Some(status) = query.status.status() {
            rest = rest.eq("status", status);
        }
        if let Some(service_id) = query.service_id {
            rest = rest.eq("service_id", service_id);
        }
        if let Some(slug) = &query.slug {
            rest = rest.eq("slug", slug);
        }
        rest
    }

    fn from_row(row: &Value) -> Option<BlogPost> {
        let row = row.as_object()?;
        let id = normalize::integer(row.get("id")?)?;
        let title = normalize::text(row.get("title"));
        let content = normalize::text(row.get("content"));

        Some(BlogPost {
            id,
            service_id: normalize::service_id(row.get("service_id")).ok().flatten(),
            slug: resolve_slug(normalize::optional_text(row.get("slug")).as_deref(), &title),
            excerpt: build_excerpt(normalize::optional_text(row.get("excerpt")), &content),
            cover_image_url: normalize::http_url(row.get("cover_image_url")),
            status: normalize::stored_status(row.get("status")),
            published_at: normalize::stored_timestamp(row.get("published_at")),
            created_at: normalize::stored_timestamp(row.get("created_at")),
            updated_at: normalize::stored_timestamp(row.get("updated_at")),
            title,
            content,
        })
    }
}

fn required_title(input: &RawInput) -> Result<String> {
    let title = normalize::text(input.get("title"));
    if title.is_empty() {
        return Err(VitrineError::Validation("Blog title is required".to_string()));
    }
    Ok(normalize::capped(title, TITLE_MAX_CHARS))
}

fn required_content(input: &RawInput) -> Result<String> {
    let content = normalize::text(input.get("content"));
    if content.is_empty() {
        return Err(VitrineError::Validation("Blog content is required".to_string()));
    }
    Ok(content)
}

fn service_id(input: &RawInput) -> Result<Option<i64>> {
    normalize::service_id(input.get("service_id"))
        .map_err(|_| VitrineError::Validation("Valid service_id is required".to_string()))
}

fn status(input: &RawInput) -> Result<ContentStatus> {
    normalize::write_status(input.get("status"))
        .ok_or_else(|| VitrineError::Validation("Status must be live or draft".to_string()))
}

fn published_at(input: &RawInput) -> Result<Option<DateTime<Utc>>> {
    normalize::timestamp(input.get("published_at"))
        .map_err(|_| VitrineError::Validation("Invalid published_at timestamp".to_string()))
}

fn explicit_excerpt(input: &RawInput) -> Option<String> {
    normalize::optional_text(input.get("excerpt"))
        .map(|excerpt| normalize::capped(excerpt, EXCERPT_MAX_CHARS))
}

fn cover_image_url(input: &RawInput) -> Option<String> {
    let value = input.get("cover_image_url");
    let url = normalize::http_url(value);
    if url.is_none() && normalize::optional_text(value).is_some() {
        warn!(value = ?value, "Ignoring cover_image_url that is not an absolute http(s) URL");
    }
    url
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn input(value: Value) -> RawInput {
        value.as_object().cloned().unwrap()
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_parse_create_defaults() {
        let draft = BlogKind::parse_create(&input(json!({
            "title": "  Winter Plumbing Tips ",
            "content": "<p>Hello <b>world</b></p>",
            "excerpt": null
        })))
        .unwrap();

        assert_eq!(draft.title, "Winter Plumbing Tips");
        assert_eq!(draft.slug, "winter-plumbing-tips");
        assert_eq!(draft.excerpt, "Hello world");
        assert_eq!(draft.status, ContentStatus::Draft);
        assert_eq!(draft.service_id, None);
        assert_eq!(draft.published_at, None);
    }

    #[test]
    fn test_zero_service_id_is_general() {
        let draft = BlogKind::parse_create(&input(json!({
            "title": "General", "content": "x", "service_id": 0
        })))
        .unwrap();
        assert_eq!(draft.service_id, None);

        let patch = BlogKind::parse_patch(&input(json!({ "service_id": "0" }))).unwrap();
        assert_eq!(patch.service_id, Some(None));
    }

    #[test]
    fn test_parse_create_validation() {
        let err = BlogKind::parse_create(&input(json!({ "content": "x" }))).unwrap_err();
        assert_eq!(err, VitrineError::Validation("Blog title is required".to_string()));

        let err = BlogKind::parse_create(&input(json!({ "title": "x", "content": "  " }))).unwrap_err();
        assert_eq!(err, VitrineError::Validation("Blog content is required".to_string()));

        let err = BlogKind::parse_create(&input(json!({
            "title": "x", "content": "y", "service_id": "abc"
        })))
        .unwrap_err();
        assert_eq!(err.status(), 400);

        let err = BlogKind::parse_create(&input(json!({
            "title": "x", "content": "y", "status": "archived"
        })))
        .unwrap_err();
        assert_eq!(err.status(), 400);

        let err = BlogKind::parse_create(&input(json!({
            "title": "x", "content": "y", "published_at": "soon"
        })))
        .unwrap_err();
        assert_eq!(err.status(), 400);
    }

    #[test]
    fn test_parse_create_caps_title_and_drops_bad_url() {
        let draft = BlogKind::parse_create(&input(json!({
            "title": "t".repeat(250),
            "content": "body",
            "cover_image_url": "not a url"
        })))
        .unwrap();
        assert_eq!(draft.title.chars().count(), TITLE_MAX_CHARS);
        assert_eq!(draft.cover_image_url, None);
    }

    #[test]
    fn test_live_entry_is_published_on_creation() {
        let draft = BlogKind::parse_create(&input(json!({
            "title": "Hello", "content": "Body", "status": "LIVE"
        })))
        .unwrap();
        let entry = BlogKind::new_entry(&draft, 1, now());
        assert_eq!(entry.published_at, Some(now()));
        assert_eq!(entry.created_at, Some(now()));
    }

    #[test]
    fn test_retitle_rederives_slug() {
        let draft = BlogKind::parse_create(&input(json!({ "title": "Old", "content": "Body" }))).unwrap();
        let entry = BlogKind::new_entry(&draft, 1, now());

        let patch = BlogKind::parse_patch(&input(json!({ "title": "New Title" }))).unwrap();
        let updated = BlogKind::apply_patch(&entry, &patch, now());
        assert_eq!(updated.slug, "new-title");

        let patch = BlogKind::parse_patch(&input(json!({ "title": "Other", "slug": "Keep Me" }))).unwrap();
        let updated = BlogKind::apply_patch(&entry, &patch, now());
        assert_eq!(updated.slug, "keep-me");
    }

    #[test]
    fn test_content_change_rebuilds_excerpt() {
        let draft = BlogKind::parse_create(&input(json!({
            "title": "T", "content": "First", "excerpt": "Custom"
        })))
        .unwrap();
        let entry = BlogKind::new_entry(&draft, 1, now());
        assert_eq!(entry.excerpt, "Custom");

        let patch = BlogKind::parse_patch(&input(json!({ "title": "T2" }))).unwrap();
        assert_eq!(BlogKind::apply_patch(&entry, &patch, now()).excerpt, "Custom");

        let patch = BlogKind::parse_patch(&input(json!({ "content": "<i>Second</i>" }))).unwrap();
        assert_eq!(BlogKind::apply_patch(&entry, &patch, now()).excerpt, "Second");
    }

    #[test]
    fn test_explicit_null_published_at_clears() {
        let draft = BlogKind::parse_create(&input(json!({
            "title": "T", "content": "C", "status": "live"
        })))
        .unwrap();
        let entry = BlogKind::new_entry(&draft, 1, now());

        let patch = BlogKind::parse_patch(&input(json!({ "published_at": null }))).unwrap();
        let updated = BlogKind::apply_patch(&entry, &patch, now());
        assert_eq!(updated.published_at, None);
        assert_eq!(updated.status, ContentStatus::Live);
    }

    #[test]
    fn test_from_row_is_lenient() {
        let row = json!({
            "id": "5",
            "title": " Hello ",
            "content": "<p>Body</p>",
            "status": "weird",
            "service_id": -3,
            "cover_image_url": "nope",
            "published_at": "2024-01-02T03:04:05+00:00"
        });
        let entry = BlogKind::from_row(&row).unwrap();
        assert_eq!(entry.id, 5);
        assert_eq!(entry.title, "Hello");
        assert_eq!(entry.slug, "hello");
        assert_eq!(entry.excerpt, "Body");
        assert_eq!(entry.status, ContentStatus::Live);
        assert_eq!(entry.service_id, None);
        assert_eq!(entry.cover_image_url, None);
        assert!(entry.published_at.is_some());
        assert_eq!(entry.created_at, None);

        assert!(BlogKind::from_row(&json!({ "title": "no id" })).is_none());
        assert!(BlogKind::from_row(&json!([1, 2])).is_none());
    }

    #[test]
    fn test_push_filters() {
        let query = ListQuery::default().with_service_id(2).with_slug("a-b");
        let path = BlogKind::push_filters(&query, RestQuery::new(BLOG_COLLECTION)).to_path();
        assert_eq!(path, "/service_blogs?status=eq.live&service_id=eq.2&slug=eq.a-b");
    }
}
