//! Client error types for the REST backend

/// Error type for REST backend operations
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The backend answered with a non-success status. The body text is kept
    /// verbatim so callers can classify the failure.
    #[error("remote returned status {status}: {body}")]
    Api { status: u16, body: String },

    #[error("request timeout")]
    Timeout,

    #[error("transport error: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("invalid response body: {0}")]
    Decode(String),

    #[error("invalid client configuration: {0}")]
    Config(String),
}

impl ClientError {
    /// HTTP status reported by the backend, if the request reached it.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Raw error body reported by the backend, if any.
    pub fn body(&self) -> Option<&str> {
        match self {
            ClientError::Api { body, .. } => Some(body.as_str()),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ClientError::Timeout
        } else {
            ClientError::Transport(err)
        }
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ClientError::Timeout;
        assert_eq!(err.to_string(), "request timeout");

        let err = ClientError::Api {
            status: 404,
            body: "{\"code\":\"PGRST205\"}".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "remote returned status 404: {\"code\":\"PGRST205\"}"
        );
    }

    #[test]
    fn test_status_and_body() {
        let err = ClientError::Api {
            status: 409,
            body: "duplicate key".to_string(),
        };
        assert_eq!(err.status(), Some(409));
        assert_eq!(err.body(), Some("duplicate key"));

        let err = ClientError::Decode("eof".to_string());
        assert_eq!(err.status(), None);
        assert_eq!(err.body(), None);
    }
}
