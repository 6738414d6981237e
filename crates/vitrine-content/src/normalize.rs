//! Input normalization
//!
//! Pure functions turning untyped JSON values into bounded entity fields.
//! Nothing here performs I/O, and every function is idempotent on its own
//! output.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde_json::Value;
use url::Url;

use crate::model::ContentStatus;

pub const TITLE_MAX_CHARS: usize = 200;
pub const QUESTION_MAX_CHARS: usize = 300;
pub const EXCERPT_MAX_CHARS: usize = 500;

/// Trimmed text form of a scalar value. Null, arrays and objects read as empty.
pub fn text(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

/// Like [`text`], but empty becomes `None`.
pub fn optional_text(value: Option<&Value>) -> Option<String> {
    let text = text(value);
    if text.is_empty() { None } else { Some(text) }
}

/// Cap `text` at `max` characters, cutting on a char boundary.
pub fn capped(text: String, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => text[..idx].trim_end().to_string(),
        None => text,
    }
}

/// Canonical URL-safe slug: lower-case `[a-z0-9]` runs joined by single dashes.
///
/// `&` reads as the word "and".
pub fn slugify(value: &str) -> String {
    let lowered = value.to_lowercase().replace('&', " and ");
    let mut slug = String::with_capacity(lowered.len());
    let mut pending_dash = false;

    for c in lowered.chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c);
        } else {
            pending_dash = true;
        }
    }

    slug
}

/// Status for a write. Absent or empty defaults to draft; unknown values are rejected.
pub fn write_status(value: Option<&Value>) -> Option<ContentStatus> {
    match text(value).to_lowercase().as_str() {
        "" | "draft" => Some(ContentStatus::Draft),
        "live" => Some(ContentStatus::Live),
        _ => None,
    }
}

/// Status of a stored row. Anything other than `draft` reads as live.
pub fn stored_status(value: Option<&Value>) -> ContentStatus {
    if text(value).eq_ignore_ascii_case("draft") {
        ContentStatus::Draft
    } else {
        ContentStatus::Live
    }
}

/// Integer coercion for numbers and numeric strings. Fractions are rejected.
pub fn integer(value: &Value) -> Option<i64> {
    let number = match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                return Some(i);
            }
            n.as_f64()?
        }
        Value::String(s) => {
            let s = s.trim();
            if let Ok(i) = s.parse::<i64>() {
                return Some(i);
            }
            s.parse::<f64>().ok()?
        }
        _ => return None,
    };

    if number.is_finite() && number.fract() == 0.0 && number.abs() < i64::MAX as f64 {
        Some(number as i64)
    } else {
        None
    }
}

/// Service reference.
///
/// `Ok(None)` for absent, null, blank or zero input (a general entry);
/// `Err(())` for anything that is not a non-negative integer.
pub fn service_id(value: Option<&Value>) -> Result<Option<i64>, ()> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(v) => match integer(v) {
            Some(0) => Ok(None),
            Some(id) if id > 0 => Ok(Some(id)),
            _ => Err(()),
        },
    }
}

/// FAQ display order: floored, clamped at zero, non-numeric reads as 0.
pub fn display_order(value: Option<&Value>) -> i64 {
    let number = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    match number {
        Some(n) if n.is_finite() => n.floor().clamp(0.0, i64::MAX as f64) as i64,
        _ => 0,
    }
}

/// Absolute `http`/`https` URL, or `None`.
pub fn http_url(value: Option<&Value>) -> Option<String> {
    let text = optional_text(value)?;
    match Url::parse(&text) {
        Ok(url) if matches!(url.scheme(), "http" | "https") && url.has_host() => Some(text),
        _ => None,
    }
}

/// Explicit timestamp.
///
/// `Ok(None)` for null or blank input; `Err(())` when the text does not parse.
pub fn timestamp(value: Option<&Value>) -> Result<Option<DateTime<Utc>>, ()> {
    match optional_text(value) {
        None => Ok(None),
        Some(text) => parse_timestamp(&text).map(Some).ok_or(()),
    }
}

/// Lenient timestamp read for stored rows; anything unreadable is `None`.
pub fn stored_timestamp(value: Option<&Value>) -> Option<DateTime<Utc>> {
    match value {
        Some(Value::String(s)) => parse_timestamp(s.trim()),
        _ => None,
    }
}

fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(text) {
        return Some(ts.with_timezone(&Utc));
    }

    // timestamp columns without a zone come back as naive values
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .map(|naive| naive.and_utc())
}
