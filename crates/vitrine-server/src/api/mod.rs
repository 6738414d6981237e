// HTTP API handlers

pub mod content; // Blog post and FAQ collections
pub mod health; // Liveness check

use actix_web::web;
use vitrine_content::{BlogKind, FaqKind};

/// Register every API route.
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(health::health)
        .service(content::routes::<BlogKind>())
        .service(content::routes::<FaqKind>());
}
