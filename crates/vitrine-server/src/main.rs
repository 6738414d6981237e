//! Main entry point for the Vitrine admin server.

use std::sync::Arc;

use clap::Parser;
use tracing::info;
use vitrine_client::RestHttpClient;
use vitrine_content::{BlogService, FaqService};
use vitrine_server::{
    model::{common::AppState, config::Cli},
    startup, Configuration,
};

#[actix_web::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let configuration = Configuration::load(Cli::parse())?;

    let _logging_guard = startup::init_logging(&configuration.logging_config())?;

    let backend = Arc::new(RestHttpClient::new(configuration.rest_client_config()?)?);
    let data_dir = configuration.data_dir();
    info!(
        remote = %backend.config().base_url,
        data_dir = %data_dir.display(),
        "Content stores configured"
    );

    let blogs = BlogService::from_backend(backend.clone(), &data_dir);
    let faqs = FaqService::from_backend(backend, &data_dir);

    let address = configuration.server_address();
    let port = configuration.server_port();
    let app_state = Arc::new(AppState::new(configuration, blogs, faqs)?);

    info!("Vitrine server listening on {}:{}", address, port);
    startup::http_server(app_state, address, port)?.await?;

    Ok(())
}
