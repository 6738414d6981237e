//! Remote store adapter over the REST backend

use std::marker::PhantomData;
use std::sync::Arc;

use anyhow::anyhow;
use async_trait::async_trait;
use chrono::Utc;
use serde_json::{Map, Value};
use tracing::{debug, warn};
use vitrine_client::{RestBackend, RestQuery};

use super::{ContentStore, FailureClassifier, PostgrestClassifier, StoreError, StoreResult};
use crate::kind::ContentKind;
use crate::model::ListQuery;

/// Content store backed by one remote collection
pub struct RemoteStore<K: ContentKind> {
    backend: Arc<dyn RestBackend>,
    classifier: Arc<dyn FailureClassifier>,
    _kind: PhantomData<fn() -> K>,
}

impl<K: ContentKind> RemoteStore<K> {
    /// Create a store using the PostgREST classifier for `K::COLLECTION`.
    pub fn new(backend: Arc<dyn RestBackend>) -> Self {
        Self::with_classifier(backend, Arc::new(PostgrestClassifier::new(K::COLLECTION)))
    }

    pub fn with_classifier(
        backend: Arc<dyn RestBackend>,
        classifier: Arc<dyn FailureClassifier>,
    ) -> Self {
        Self {
            backend,
            classifier,
            _kind: PhantomData,
        }
    }

    fn by_id(id: i64) -> RestQuery {
        RestQuery::new(K::COLLECTION).eq("id", id)
    }

    async fn fetch(&self, id: i64) -> StoreResult<Option<K::Entry>> {
        let path = RestQuery::new(K::COLLECTION)
            .select(K::COLUMNS)
            .eq("id", id)
            .limit(1)
            .to_path();

        let rows = self
            .backend
            .select(&path)
            .await
            .map_err(|e| self.classifier.classify(e))?;
        Ok(entries::<K>(rows).into_iter().next())
    }
}

#[async_trait]
impl<K: ContentKind> ContentStore<K> for RemoteStore<K> {
    fn name(&self) -> &'static str {
        "remote"
    }

    async fn list(&self, query: &ListQuery) -> StoreResult<Vec<K::Entry>> {
        let rest = RestQuery::new(K::COLLECTION)
            .select(K::COLUMNS)
            .limit(query.limit)
            .order(K::ORDER);
        let path = K::push_filters(query, rest).to_path();

        let rows = self
            .backend
            .select(&path)
            .await
            .map_err(|e| self.classifier.classify(e))?;
        Ok(entries::<K>(rows))
    }

    async fn insert(&self, draft: &K::Draft) -> StoreResult<K::Entry> {
        let mut row = to_object(&K::new_entry(draft, 0, Utc::now()))?;
        // the backend assigns ids
        row.remove("id");

        let path = RestQuery::new(K::COLLECTION).to_path();
        let created = self
            .backend
            .insert(&path, &Value::Object(row))
            .await
            .map_err(|e| self.classifier.classify(e))?;

        entries::<K>(created)
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::Other(anyhow!("{} insert returned no row", K::COLLECTION)))
    }

    async fn update(&self, id: i64, patch: &K::Patch) -> StoreResult<K::Entry> {
        let current = self.fetch(id).await?.ok_or(StoreError::NotFound)?;
        let merged = K::apply_patch(&current, patch, Utc::now());
        let body = changed_columns(&to_object(&current)?, to_object(&merged)?);

        debug!(
            collection = K::COLLECTION,
            id,
            columns = ?body.keys().collect::<Vec<_>>(),
            "Updating remote row"
        );

        let updated = self
            .backend
            .update(&Self::by_id(id).to_path(), &Value::Object(body))
            .await
            .map_err(|e| self.classifier.classify(e))?;

        entries::<K>(updated)
            .into_iter()
            .next()
            .ok_or(StoreError::NotFound)
    }

    async fn delete(&self, id: i64) -> StoreResult<()> {
        let exists_path = Self::by_id(id).select("id").limit(1).to_path();
        let existing = self
            .backend
            .select(&exists_path)
            .await
            .map_err(|e| self.classifier.classify(e))?;

        if !matches!(&existing, Value::Array(rows) if !rows.is_empty()) {
            return Err(StoreError::NotFound);
        }

        self.backend
            .delete(&Self::by_id(id).to_path())
            .await
            .map_err(|e| self.classifier.classify(e))?;
        Ok(())
    }
}

/// Normalize a response body into entries; rows without a usable id are skipped.
fn entries<K: ContentKind>(value: Value) -> Vec<K::Entry> {
    let Value::Array(rows) = value else {
        return Vec::new();
    };

    rows.iter()
        .filter_map(|row| {
            let entry = K::from_row(row);
            if entry.is_none() {
                warn!(collection = K::COLLECTION, row = %row, "Skipping remote row without a valid id");
            }
            entry
        })
        .collect()
}

fn to_object<T: serde::Serialize>(entry: &T) -> StoreResult<Map<String, Value>> {
    match serde_json::to_value(entry).map_err(anyhow::Error::from)? {
        Value::Object(map) => Ok(map),
        other => Err(StoreError::Other(anyhow!("entry serialized to {}", other))),
    }
}

/// Columns of `merged` that differ from `current`, always including `updated_at`.
fn changed_columns(current: &Map<String, Value>, merged: Map<String, Value>) -> Map<String, Value> {
    merged
        .into_iter()
        .filter(|(column, value)| {
            column != "id" && (column == "updated_at" || current.get(column) != Some(value))
        })
        .collect()
}
