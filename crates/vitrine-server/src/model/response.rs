//! HTTP response bodies

use actix_web::{HttpResponse, HttpResponseBuilder, http::StatusCode};
use serde::{Deserialize, Serialize};

/// Body of every error response
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ErrorResult {
    pub code: i32,
    pub message: String,
}

impl ErrorResult {
    pub fn new(code: i32, message: String) -> Self {
        ErrorResult { code, message }
    }

    pub fn http_response(status: u16, code: i32, message: String) -> HttpResponse {
        HttpResponseBuilder::new(
            StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        )
        .json(ErrorResult::new(code, message))
    }
}

/// Body of the health check
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub ok: bool,
}
