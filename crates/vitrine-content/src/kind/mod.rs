//! Entity-kind descriptors
//!
//! A [`ContentKind`] captures everything that differs between blog posts and
//! FAQ entries: field parsing, merge rules, uniqueness, ordering and the remote
//! collection layout. Stores and the content service are generic over it.

mod blog;
mod faq;

pub use blog::BlogKind;
pub use faq::FaqKind;

use std::cmp::Ordering;
use std::fmt::Debug;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use vitrine_client::RestQuery;
use vitrine_common::error::Result;

use crate::model::{ListQuery, RawInput};

/// Descriptor for one kind of content entry
pub trait ContentKind: Send + Sync + 'static {
    /// Stored entity
    type Entry: Clone + Debug + PartialEq + Serialize + Send + Sync + 'static;
    /// Fully validated create payload
    type Draft: Clone + Debug + Send + Sync + 'static;
    /// Validated partial update
    type Patch: Clone + Debug + Default + Send + Sync + 'static;

    /// Remote collection name
    const COLLECTION: &'static str;
    /// Fallback file name inside the data directory
    const FALLBACK_FILE: &'static str;
    /// Column list requested from the remote store
    const COLUMNS: &'static str;
    /// Ordering requested from the remote store
    const ORDER: &'static str;

    const INVALID_ID: &'static str;
    const NOT_FOUND: &'static str;
    /// Message naming the uniqueness rule this kind enforces
    const CONFLICT: &'static str;

    /// Validate a create payload. Required fields are enforced.
    fn parse_create(input: &RawInput) -> Result<Self::Draft>;

    /// Validate a partial update. Only supplied fields are checked.
    fn parse_patch(input: &RawInput) -> Result<Self::Patch>;

    /// Materialize a draft with the given identity and creation time.
    fn new_entry(draft: &Self::Draft, id: i64, now: DateTime<Utc>) -> Self::Entry;

    /// Merge a patch into an existing entry, re-deriving dependent fields.
    fn apply_patch(existing: &Self::Entry, patch: &Self::Patch, now: DateTime<Utc>) -> Self::Entry;

    fn id(entry: &Self::Entry) -> i64;

    /// Whether two distinct entries violate the kind's uniqueness rule.
    fn conflicts(a: &Self::Entry, b: &Self::Entry) -> bool;

    /// List ordering.
    fn compare(a: &Self::Entry, b: &Self::Entry) -> Ordering;

    /// Client-side equivalent of the remote filters.
    fn matches(entry: &Self::Entry, query: &ListQuery) -> bool;

    /// Push list filters down to the remote query.
    fn push_filters(query: &ListQuery, rest: RestQuery) -> RestQuery;

    /// Lenient read of a stored row. `None` when the row has no usable id.
    fn from_row(row: &Value) -> Option<Self::Entry>;
}

/// Newest first, entries without a timestamp last.
pub(crate) fn newest_first(a: Option<DateTime<Utc>>, b: Option<DateTime<Utc>>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Returns true when the input carries `key`, even with a null value.
pub(crate) fn has(input: &RawInput, key: &str) -> bool {
    input.contains_key(key)
}
