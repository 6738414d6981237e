//! Vitrine Client - REST client for the Postgres-via-REST backend
//!
//! This crate provides:
//! - HTTP client with service-key authentication and bounded timeouts
//! - `RestBackend` trait, the request surface consumed by the content stores
//! - Row-filter query builder for the PostgREST dialect

pub mod error;
pub mod http;
pub mod query;

pub use error::ClientError;
pub use http::{RestBackend, RestClientConfig, RestHttpClient};
pub use query::RestQuery;
