use actix_web::{HttpResponse, Responder, get};

use crate::model::response::HealthStatus;

#[get("/health")]
pub async fn health() -> impl Responder {
    HttpResponse::Ok().json(HealthStatus { ok: true })
}
