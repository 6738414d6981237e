//! FAQ entry descriptor

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde_json::Value;
use vitrine_client::RestQuery;
use vitrine_common::{FAQ_COLLECTION, FAQ_FALLBACK_FILE, VitrineError, error::Result};

use super::{ContentKind, has, newest_first};
use crate::model::{ContentStatus, FaqDraft, FaqEntry, FaqPatch, ListQuery, RawInput};
use crate::normalize::{self, QUESTION_MAX_CHARS};

pub struct FaqKind;

impl ContentKind for FaqKind {
    type Entry = FaqEntry;
    type Draft = FaqDraft;
    type Patch = FaqPatch;

    const COLLECTION: &'static str = FAQ_COLLECTION;
    const FALLBACK_FILE: &'static str = FAQ_FALLBACK_FILE;
    const COLUMNS: &'static str =
        "id,service_id,question,answer,status,display_order,created_at,updated_at";
    const ORDER: &'static str = "service_id.asc,display_order.asc,created_at.desc";

    const INVALID_ID: &'static str = "Invalid FAQ id";
    const NOT_FOUND: &'static str = "FAQ not found";
    const CONFLICT: &'static str = "Duplicate FAQ detected";

    fn parse_create(input: &RawInput) -> Result<FaqDraft> {
        Ok(FaqDraft {
            service_id: required_service_id(input)?,
            question: required_question(input)?,
            answer: required_answer(input)?,
            status: status(input)?,
            display_order: normalize::display_order(input.get("display_order")),
        })
    }

    fn parse_patch(input: &RawInput) -> Result<FaqPatch> {
        let mut patch = FaqPatch::default();

        if has(input, "service_id") {
            patch.service_id = Some(required_service_id(input)?);
        }
        if has(input, "question") {
            patch.question = Some(required_question(input)?);
        }
        if has(input, "answer") {
            patch.answer = Some(required_answer(input)?);
        }
        if has(input, "status") {
            patch.status = Some(status(input)?);
        }
        if has(input, "display_order") {
            patch.display_order = Some(normalize::display_order(input.get("display_order")));
        }

        Ok(patch)
    }

    fn new_entry(draft: &FaqDraft, id: i64, now: DateTime<Utc>) -> FaqEntry {
        FaqEntry {
            id,
            service_id: draft.service_id,
            question: draft.question.clone(),
            answer: draft.answer.clone(),
            status: draft.status,
            display_order: draft.display_order,
            created_at: Some(now),
            updated_at: Some(now),
        }
    }

    fn apply_patch(existing: &FaqEntry, patch: &FaqPatch, now: DateTime<Utc>) -> FaqEntry {
        FaqEntry {
            id: existing.id,
            service_id: patch.service_id.unwrap_or(existing.service_id),
            question: patch
                .question
                .clone()
                .unwrap_or_else(|| existing.question.clone()),
            answer: patch
                .answer
                .clone()
                .unwrap_or_else(|| existing.answer.clone()),
            status: patch.status.unwrap_or(existing.status),
            display_order: patch.display_order.unwrap_or(existing.display_order),
            created_at: existing.created_at,
            updated_at: Some(now),
        }
    }

    fn id(entry: &FaqEntry) -> i64 {
        entry.id
    }

    fn conflicts(a: &FaqEntry, b: &FaqEntry) -> bool {
        a.service_id == b.service_id && a.question.to_lowercase() == b.question.to_lowercase()
    }

    fn compare(a: &FaqEntry, b: &FaqEntry) -> Ordering {
        a.service_id
            .cmp(&b.service_id)
            .then(a.display_order.cmp(&b.display_order))
            .then_with(|| newest_first(a.created_at, b.created_at))
            .then_with(|| a.id.cmp(&b.id))
    }

    fn matches(entry: &FaqEntry, query: &ListQuery) -> bool {
        query.status.matches(entry.status)
            && query.service_id.is_none_or(|id| entry.service_id == id)
    }

    fn push_filters(query: &ListQuery, mut rest: RestQuery) -> RestQuery {
        if let Some(status) = query.status.status() {
            rest = rest.eq("status", status);
        }
        if let Some(service_id) = query.service_id {
            rest = rest.eq("service_id", service_id);
        }
        rest
    }

    fn from_row(row: &Value) -> Option<FaqEntry> {
        let row = row.as_object()?;
        let id = normalize::integer(row.get("id")?)?;

        Some(FaqEntry {
            id,
            service_id: normalize::service_id(row.get("service_id"))
                .ok()
                .flatten()
                .unwrap_or(0),
            question: normalize::text(row.get("question")),
            answer: normalize::text(row.get("answer")),
            status: normalize::stored_status(row.get("status")),
            display_order: normalize::display_order(row.get("display_order")),
            created_at: normalize::stored_timestamp(row.get("created_at")),
            updated_at: normalize::stored_timestamp(row.get("updated_at")),
        })
    }
}

fn required_service_id(input: &RawInput) -> Result<i64> {
    match normalize::service_id(input.get("service_id")) {
        Ok(Some(id)) => Ok(id),
        _ => Err(VitrineError::Validation(
            "Valid service_id is required".to_string(),
        )),
    }
}

fn required_question(input: &RawInput) -> Result<String> {
    let question = normalize::text(input.get("question"));
    if question.is_empty() {
        return Err(VitrineError::Validation("Question is required".to_string()));
    }
    Ok(normalize::capped(question, QUESTION_MAX_CHARS))
}

fn required_answer(input: &RawInput) -> Result<String> {
    let answer = normalize::text(input.get("answer"));
    if answer.is_empty() {
        return Err(VitrineError::Validation("Answer is required".to_string()));
    }
    Ok(answer)
}

fn status(input: &RawInput) -> Result<ContentStatus> {
    normalize::write_status(input.get("status"))
        .ok_or_else(|| VitrineError::Validation("Status must be live or draft".to_string()))
}
