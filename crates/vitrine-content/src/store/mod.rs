//! Content stores
//!
//! Two implementations share the [`ContentStore`] surface:
//! - [`RemoteStore`]: the Postgres-via-REST backend
//! - [`FallbackStore`]: a local JSON file per collection, used while the remote
//!   schema lags behind

pub mod classify;
pub mod fallback;
pub mod remote;

pub use classify::{FailureClassifier, PostgrestClassifier};
pub use fallback::FallbackStore;
pub use remote::RemoteStore;

use async_trait::async_trait;

use crate::kind::ContentKind;
use crate::model::ListQuery;

/// Outcome of a failed store operation
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("entry not found")]
    NotFound,

    /// The collection or one of its columns does not exist in the store.
    /// A routing signal, never shown to callers.
    #[error("schema missing: {0}")]
    SchemaMissing(String),

    #[error("duplicate key: {0}")]
    DuplicateKey(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// CRUD surface shared by the remote and fallback stores
#[async_trait]
pub trait ContentStore<K: ContentKind>: Send + Sync {
    /// Short store name for logs
    fn name(&self) -> &'static str;

    /// Entries matching `query`, in the kind's list order, at most `query.limit`.
    async fn list(&self, query: &ListQuery) -> StoreResult<Vec<K::Entry>>;

    /// Persist a new entry; the store assigns its id.
    async fn insert(&self, draft: &K::Draft) -> StoreResult<K::Entry>;

    async fn update(&self, id: i64, patch: &K::Patch) -> StoreResult<K::Entry>;

    async fn delete(&self, id: i64) -> StoreResult<()>;
}
