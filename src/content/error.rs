use thiserror::Error;

/// Errors that can occur when reading from the content store
#[derive(Error, Debug)]
pub enum ContentError {
    #[error("Content store unavailable")]
    Unavailable,

    #[error("Request timeout")]
    Timeout,

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Unexpected query result: {0}")]
    Decode(String),

    #[error("Invalid content store configuration: {0}")]
    InvalidConfig(String),
}

impl ContentError {
    /// Classify a transport error the way callers care about
    pub(crate) fn from_transport(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ContentError::Timeout
        } else if e.is_connect() {
            ContentError::Unavailable
        } else {
            ContentError::Request(e)
        }
    }
}
