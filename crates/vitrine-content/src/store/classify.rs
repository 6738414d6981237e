//! Remote failure classification
//!
//! The backend reports errors as JSON bodies such as
//! `{"code":"42P01","message":"relation \"public.service_blogs\" does not exist"}`.
//! Classification decides whether a failure is a uniqueness violation, a
//! missing table/column for *this* collection, or anything else.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;
use vitrine_client::ClientError;

use super::StoreError;

const UNIQUE_VIOLATION_CODE: &str = "23505";
const UNIQUE_VIOLATION_TEXT: &str = "duplicate key value violates unique constraint";

/// Codes the backend uses for undefined tables and columns
const SCHEMA_CODES: [&str; 4] = ["42P01", "42703", "PGRST204", "PGRST205"];

/// Each pattern captures the table the message is about.
static SCHEMA_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r#"(?i)^relation "(?:public\.)?(\w+)" does not exist$"#,
        r#"(?i)^column (\w+)\.\w+ does not exist$"#,
        r#"(?i)^column "\w+" of relation "(?:public\.)?(\w+)" does not exist$"#,
        r#"(?i)^could not find the table '(?:public\.)?(\w+)' in the schema cache$"#,
        r#"(?i)^could not find the '\w+' column of '(?:public\.)?(\w+)' in the schema cache$"#,
    ]
    .iter()
    .map(|p| Regex::new(p).expect("Invalid regex pattern"))
    .collect()
});

/// Maps a transport failure to a store outcome
pub trait FailureClassifier: Send + Sync {
    fn classify(&self, error: ClientError) -> StoreError;
}

/// Classifier for PostgREST error bodies, scoped to one collection.
#[derive(Clone, Debug)]
pub struct PostgrestClassifier {
    collection: String,
}

impl PostgrestClassifier {
    pub fn new(collection: &str) -> Self {
        Self {
            collection: collection.to_lowercase(),
        }
    }

    fn is_duplicate(&self, code: Option<&str>, message: &str) -> bool {
        code == Some(UNIQUE_VIOLATION_CODE)
            || message.to_lowercase().contains(UNIQUE_VIOLATION_TEXT)
    }

    fn is_schema_missing(&self, code: Option<&str>, message: &str) -> bool {
        let message = message.trim();

        let names_collection = SCHEMA_PATTERNS.iter().any(|pattern| {
            pattern
                .captures(message)
                .and_then(|caps| caps.get(1))
                .is_some_and(|table| table.as_str().eq_ignore_ascii_case(&self.collection))
        });
        if names_collection {
            return true;
        }

        code.is_some_and(|code| SCHEMA_CODES.contains(&code))
            && mentions(message, &self.collection)
    }
}

impl FailureClassifier for PostgrestClassifier {
    fn classify(&self, error: ClientError) -> StoreError {
        let (code, message) = match error.body() {
            Some(body) => parse_error_body(body),
            None => return StoreError::Other(error.into()),
        };

        if self.is_duplicate(code.as_deref(), &message) {
            return StoreError::DuplicateKey(message);
        }
        if self.is_schema_missing(code.as_deref(), &message) {
            return StoreError::SchemaMissing(message);
        }
        StoreError::Other(error.into())
    }
}

/// Extract `code` and `message` from a JSON error body; non-JSON bodies are
/// taken as the message.
fn parse_error_body(body: &str) -> (Option<String>, String) {
    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(map)) => {
            let code = map.get("code").and_then(Value::as_str).map(str::to_string);
            let message = map
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or(body)
                .to_string();
            (code, message)
        }
        _ => (None, body.to_string()),
    }
}

/// Whole-word, case-insensitive mention of `name` in `message`.
fn mentions(message: &str, name: &str) -> bool {
    message
        .to_lowercase()
        .split(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .any(|word| word == name)
}
