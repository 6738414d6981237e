//! Error types and error codes for Vitrine
//!
//! This module defines:
//! - `VitrineError`: the caller-visible error taxonomy of the content subsystem
//! - `ErrorCode`: structured error codes for API responses

use serde::{Deserialize, Serialize};

/// Caller-visible error types.
///
/// Store-level routing signals (such as a missing remote table) never appear
/// here; they are absorbed by the content service before a result is returned.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum VitrineError {
    /// Malformed or missing required input. Detected before any I/O.
    #[error("{0}")]
    Validation(String),

    /// A uniqueness rule was violated (duplicate slug, duplicate question).
    #[error("{0}")]
    Conflict(String),

    /// The id does not exist in the store that owns the collection.
    #[error("{0}")]
    NotFound(String),

    /// The store that handled the request failed for a non-schema reason.
    #[error("{0}")]
    Unavailable(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("configuration error: {0}")]
    Config(String),
}

impl VitrineError {
    /// HTTP status class this error maps to.
    pub fn status(&self) -> u16 {
        match self {
            VitrineError::Validation(_) => 400,
            VitrineError::Unauthorized(_) => 401,
            VitrineError::NotFound(_) => 404,
            VitrineError::Conflict(_) => 409,
            VitrineError::Unavailable(_) => 503,
            VitrineError::Config(_) => 500,
        }
    }

    /// Structured error code for API responses.
    pub fn code(&self) -> ErrorCode<'static> {
        match self {
            VitrineError::Validation(_) => PARAMETER_VALIDATE_ERROR,
            VitrineError::Unauthorized(_) => ACCESS_DENIED,
            VitrineError::NotFound(_) => RESOURCE_NOT_FOUND,
            VitrineError::Conflict(_) => RESOURCE_CONFLICT,
            VitrineError::Unavailable(_) => DATA_ACCESS_ERROR,
            VitrineError::Config(_) => SERVER_ERROR,
        }
    }

    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status())
    }
}

pub type Result<T> = std::result::Result<T, VitrineError>;

/// Error code structure for API responses
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorCode<'a> {
    pub code: i32,
    pub message: &'a str,
}

pub const SUCCESS: ErrorCode<'static> = ErrorCode {
    code: 0,
    message: "success",
};

pub const ACCESS_DENIED: ErrorCode<'static> = ErrorCode {
    code: 10001,
    message: "access denied",
};

pub const DATA_ACCESS_ERROR: ErrorCode<'static> = ErrorCode {
    code: 10002,
    message: "data access error",
};

pub const PARAMETER_VALIDATE_ERROR: ErrorCode<'static> = ErrorCode {
    code: 20002,
    message: "parameter validate error",
};

pub const RESOURCE_NOT_FOUND: ErrorCode<'static> = ErrorCode {
    code: 20004,
    message: "resource not found",
};

pub const RESOURCE_CONFLICT: ErrorCode<'static> = ErrorCode {
    code: 20005,
    message: "resource conflict",
};

pub const SERVER_ERROR: ErrorCode<'static> = ErrorCode {
    code: 30000,
    message: "server error",
};
