//! Tradier-specific error types.

use thiserror::Error;

use crate::application::ports::BrokerError;

/// Errors from the Tradier adapter.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TradierError {
    /// Access token or account id missing.
    #[error("Missing credentials: {0}")]
    MissingCredentials(&'static str),

    /// HTTP client could not be built.
    #[error("HTTP client error: {0}")]
    Http(String),

    /// Connection-level failure.
    #[error("Network error: {0}")]
    Network(String),

    /// Request exceeded the configured timeout.
    #[error("Request timed out")]
    Timeout,

    /// Caller cancelled the request.
    #[error("Request cancelled")]
    Cancelled,

    /// Non-2xx response, or a 2xx body carrying an `errors` object.
    #[error("API error {status}: {body}")]
    Api {
        /// HTTP status.
        status: u16,
        /// Raw response body.
        body: String,
    },

    /// Body could not be decoded.
    #[error("JSON parsing error: {0}")]
    JsonParse(String),

    /// Body decoded but did not have the expected content.
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),
}

impl From<TradierError> for BrokerError {
    fn from(err: TradierError) -> Self {
        match err {
            TradierError::Network(message) => Self::Transport { message },
            TradierError::Timeout => Self::Timeout,
            TradierError::Cancelled => Self::Cancelled,
            TradierError::Api { status, body } => Self::Api { status, body },
            TradierError::MissingCredentials(what) => Self::Internal {
                message: format!("missing credentials: {what}"),
            },
            TradierError::Http(message)
            | TradierError::JsonParse(message)
            | TradierError::UnexpectedResponse(message) => Self::Internal { message },
        }
    }
}
