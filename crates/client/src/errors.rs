use thiserror::Error;

/// Failures surfaced by the API client.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Network/DNS/timeout failure: no response was obtained.
    #[error("transport error: {0}")]
    Transport(String),
    /// Non-success HTTP status, carrying the server-supplied message.
    #[error("request failed ({status}): {message}")]
    Request { status: u16, message: String },
    /// Local input or payload rejection; never reaches the network.
    #[error("validation error: {0}")]
    Validation(String),
    #[error("invalid url: {0}")]
    Url(String),
    #[error("session storage error: {0}")]
    Storage(#[from] service::errors::ServiceError),
}

impl ApiError {
    /// Stable numeric code for external mapping/logging.
    pub fn code(&self) -> u16 {
        match self {
            ApiError::Transport(_) => 2001,
            ApiError::Request { .. } => 2002,
            ApiError::Validation(_) => 2003,
            ApiError::Url(_) => 2004,
            ApiError::Storage(_) => 2101,
        }
    }
}
