// Error handling for the HTTP layer
// Maps the content taxonomy onto status codes and `ErrorResult` bodies

use std::fmt::{Display, Formatter};

use actix_web::HttpResponse;
use vitrine_common::{VitrineError, error::SERVER_ERROR};

use crate::model::response::ErrorResult;

// Local wrapper so actix-web's ResponseError can be implemented
#[derive(Debug)]
pub struct AppError {
    inner: anyhow::Error,
}

impl Display for AppError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(value: anyhow::Error) -> Self {
        AppError { inner: value }
    }
}

impl From<VitrineError> for AppError {
    fn from(value: VitrineError) -> Self {
        AppError {
            inner: anyhow::Error::new(value),
        }
    }
}

impl AppError {
    pub fn inner(&self) -> &anyhow::Error {
        &self.inner
    }

    pub fn downcast_ref<E: std::error::Error + Send + Sync + 'static>(&self) -> Option<&E> {
        self.inner.downcast_ref::<E>()
    }
}

impl actix_web::error::ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        match self.downcast_ref::<VitrineError>() {
            Some(e) => ErrorResult::http_response(e.status(), e.code().code, e.to_string()),
            None => {
                tracing::error!(error = %self.inner, "Unhandled server error");
                ErrorResult::http_response(500, SERVER_ERROR.code, self.inner.to_string())
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
