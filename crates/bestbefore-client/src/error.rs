use thiserror::Error;

use bestbefore_types::validate::ValidationError;

/// Failure taxonomy for backend calls. Nothing here is retried or escalated;
/// every variant renders as a human-readable message for inline display.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Input rejected client-side, before any request was issued.
    #[error("{0}")]
    Validation(String),

    /// Connect or read failure on the wire.
    #[error("network error: {0}")]
    Transport(#[source] reqwest::Error),

    /// The backend answered with a non-2xx status.
    #[error("{message}")]
    Status { status: u16, message: String },

    /// The response body did not match the expected shape.
    #[error("unexpected response: {0}")]
    Decode(#[source] reqwest::Error),
}

impl ClientError {
    pub(crate) fn from_reqwest(e: reqwest::Error) -> Self {
        if e.is_decode() {
            Self::Decode(e)
        } else {
            Self::Transport(e)
        }
    }
}

impl From<ValidationError> for ClientError {
    fn from(e: ValidationError) -> Self {
        Self::Validation(e.0)
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
