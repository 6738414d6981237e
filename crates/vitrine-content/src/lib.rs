//! Vitrine Content - resilient content store for service blogs and FAQs
//!
//! This crate provides:
//! - Normalization of untyped input into validated entity fields
//! - Slug, identity and excerpt derivation
//! - Entity-kind descriptors for blog posts and FAQ entries
//! - A remote store over the REST backend and a file-backed fallback store
//! - `ContentService`, which routes each call to the remote store and falls
//!   back to the local file while the remote schema is missing

pub mod identity;
pub mod kind;
pub mod model;
pub mod normalize;
pub mod service;
pub mod store;

pub use kind::{BlogKind, ContentKind, FaqKind};
pub use model::{
    BlogPost, ContentStatus, FaqEntry, ListQuery, RawInput, StatusFilter,
};
pub use service::ContentService;
pub use store::{
    ContentStore, FailureClassifier, FallbackStore, PostgrestClassifier, RemoteStore, StoreError,
    StoreResult,
};

pub type BlogService = ContentService<BlogKind>;
pub type FaqService = ContentService<FaqKind>;
