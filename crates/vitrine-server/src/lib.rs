// Vitrine server - admin API for service blog posts and FAQs
// Content is served from the remote database, or from local files while the
// remote schema is missing

// Module declarations
pub mod api; // API handlers
pub mod auth; // Admin token authorization
pub mod error; // Error to HTTP response mapping
pub mod middleware; // HTTP middleware
pub mod model; // Configuration, state and response types
pub mod startup; // Application startup utilities

pub use error::AppError;
pub use model::common::{AppState, Configuration};
