//! Application startup utilities module.

mod http;
mod logging;

pub use http::{app_config, http_server};
pub use logging::{LoggingConfig, LoggingGuard, init_logging};
