//! Content service
//!
//! One instance per content kind. Each call validates its input, tries the
//! remote store, and retries exactly once against the fallback store when the
//! remote reports that the collection's schema is missing. Any other outcome
//! of either attempt is final.

use std::future::Future;
use std::path::Path;
use std::sync::Arc;

use tracing::{debug, error, warn};
use vitrine_client::RestBackend;
use vitrine_common::{VitrineError, error::Result};

use crate::kind::ContentKind;
use crate::model::{ListQuery, RawInput};
use crate::store::{ContentStore, FallbackStore, RemoteStore, StoreError, StoreResult};

pub struct ContentService<K: ContentKind> {
    remote: Arc<dyn ContentStore<K>>,
    fallback: Arc<dyn ContentStore<K>>,
}

impl<K: ContentKind> Clone for ContentService<K> {
    fn clone(&self) -> Self {
        Self {
            remote: self.remote.clone(),
            fallback: self.fallback.clone(),
        }
    }
}

impl<K: ContentKind> ContentService<K> {
    pub fn new(remote: Arc<dyn ContentStore<K>>, fallback: Arc<dyn ContentStore<K>>) -> Self {
        Self { remote, fallback }
    }

    /// Wire a service to a REST backend with its fallback file under `data_dir`.
    pub fn from_backend(backend: Arc<dyn RestBackend>, data_dir: impl AsRef<Path>) -> Self {
        Self::new(
            Arc::new(RemoteStore::<K>::new(backend)),
            Arc::new(FallbackStore::<K>::new(data_dir)),
        )
    }

    pub async fn list(&self, query: &ListQuery) -> Result<Vec<K::Entry>> {
        self.route("list", |store| async move { store.list(query).await })
            .await
    }

    pub async fn create(&self, input: &RawInput) -> Result<K::Entry> {
        let draft = K::parse_create(input)?;
        let draft = &draft;

        self.route("create", |store| async move { store.insert(draft).await })
            .await
    }

    pub async fn patch(&self, id: i64, input: &RawInput) -> Result<K::Entry> {
        Self::check_id(id)?;
        let patch = K::parse_patch(input)?;
        let patch = &patch;

        self.route("patch", |store| async move { store.update(id, patch).await })
            .await
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        Self::check_id(id)?;

        self.route("delete", |store| async move { store.delete(id).await })
            .await
    }

    fn check_id(id: i64) -> Result<()> {
        if id <= 0 {
            return Err(VitrineError::Validation(K::INVALID_ID.to_string()));
        }
        Ok(())
    }

    /// Run `call` against the remote store, rerouting once to the fallback
    /// store on a schema-missing outcome.
    async fn route<T, F, Fut>(&self, operation: &'static str, call: F) -> Result<T>
    where
        F: Fn(Arc<dyn ContentStore<K>>) -> Fut,
        Fut: Future<Output = StoreResult<T>>,
    {
        let (store, result) = match call(self.remote.clone()).await {
            Err(StoreError::SchemaMissing(detail)) => {
                warn!(
                    collection = K::COLLECTION,
                    operation,
                    detail = %detail,
                    "Remote schema missing, rerouting to fallback store"
                );
                (self.fallback.name(), call(self.fallback.clone()).await)
            }
            result => (self.remote.name(), result),
        };

        debug!(
            collection = K::COLLECTION,
            operation,
            store,
            ok = result.is_ok(),
            "Content store answered"
        );
        result.map_err(|e| Self::to_caller_error(store, operation, e))
    }

    fn to_caller_error(store: &str, operation: &str, err: StoreError) -> VitrineError {
        match err {
            StoreError::NotFound => VitrineError::NotFound(K::NOT_FOUND.to_string()),
            StoreError::DuplicateKey(_) => VitrineError::Conflict(K::CONFLICT.to_string()),
            other => {
                error!(
                    collection = K::COLLECTION,
                    operation,
                    store,
                    error = %other,
                    "Content store failed"
                );
                VitrineError::Unavailable(other.to_string())
            }
        }
    }
}
