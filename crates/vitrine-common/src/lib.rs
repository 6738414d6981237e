//! Vitrine Common - Shared types and constants
//!
//! This crate provides the foundational types used across all Vitrine components:
//! - Error taxonomy and error codes
//! - Collection names and fallback file names
//! - List defaults

pub mod error;

pub use error::{ErrorCode, VitrineError};

/// Remote collection holding service-scoped blog posts
pub const BLOG_COLLECTION: &str = "service_blogs";

/// Remote collection holding service-scoped FAQ entries
pub const FAQ_COLLECTION: &str = "service_faqs";

/// Fallback file for blog posts, relative to the fallback data directory
pub const BLOG_FALLBACK_FILE: &str = "service-blogs.json";

/// Fallback file for FAQ entries, relative to the fallback data directory
pub const FAQ_FALLBACK_FILE: &str = "service-faqs.json";

/// Default page size for list operations
pub const DEFAULT_LIST_LIMIT: usize = 120;

/// Upper bound for the page size of list operations
pub const MAX_LIST_LIMIT: usize = 200;
