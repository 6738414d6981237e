//! Shared application state

use vitrine_common::VitrineError;
use vitrine_content::{BlogService, FaqService};

use crate::auth::AuthSettings;

pub use super::config::Configuration;

/// State shared by every worker of the HTTP server
pub struct AppState {
    pub configuration: Configuration,
    pub auth: AuthSettings,
    pub blogs: BlogService,
    pub faqs: FaqService,
}

impl AppState {
    pub fn new(
        configuration: Configuration,
        blogs: BlogService,
        faqs: FaqService,
    ) -> Result<Self, VitrineError> {
        let auth = AuthSettings::new(
            configuration.admin_token()?,
            configuration.admin_username(),
        );

        Ok(Self {
            configuration,
            auth,
            blogs,
            faqs,
        })
    }
}
