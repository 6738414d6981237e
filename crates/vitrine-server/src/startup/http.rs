//! HTTP server setup

use std::sync::Arc;

use actix_web::{App, HttpServer, dev::Server, middleware::Logger, web};

use crate::{api, middleware::auth::Authentication, model::common::AppState};

/// Register routes and the request body limit on an application or test service.
///
/// Write bodies are read as raw bytes and parsed by the handlers after
/// authorization, so only the size limit applies here.
pub fn app_config(json_limit: usize) -> impl Fn(&mut web::ServiceConfig) + Clone {
    move |cfg: &mut web::ServiceConfig| {
        cfg.app_data(web::PayloadConfig::new(json_limit))
            .configure(api::routes);
    }
}

/// Creates and binds the admin HTTP server.
pub fn http_server(
    app_state: Arc<AppState>,
    address: String,
    port: u16,
) -> Result<Server, std::io::Error> {
    let json_limit = app_state.configuration.json_limit();

    Ok(HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(Authentication)
            .app_data(web::Data::from(app_state.clone()))
            .configure(app_config(json_limit))
    })
    .bind((address, port))?
    .run())
}
