//! Unified error types.

use thiserror::Error;

/// Top-level crate error.
#[derive(Error, Debug)]
pub enum SdkError {
    #[error("HTTP error: {0}")]
    Http(#[from] HttpError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Controller error: {0}")]
    Controller(#[from] ControllerError),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// HTTP-layer errors.
///
/// Kept `Clone` so a failed attempt can live inside published snapshots.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HttpError {
    #[error("Request failed: {0}")]
    Transport(String),

    #[error("Server error {status}: {body}")]
    ServerError { status: u16, body: String },

    #[error("Rate limited (retry after {retry_after_ms:?}ms)")]
    RateLimited { retry_after_ms: Option<u64> },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Timeout")]
    Timeout,

    #[error("Invalid response body: {0}")]
    Decode(String),
}

#[cfg(feature = "http")]
impl From<reqwest::Error> for HttpError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            HttpError::Timeout
        } else if e.is_decode() {
            HttpError::Decode(e.to_string())
        } else {
            HttpError::Transport(e.to_string())
        }
    }
}

/// Outcome of a single failed fetch attempt.
///
/// Local to the attempt: it becomes the `Error` status of the current
/// [`FetchResult`](crate::domain::fetch::FetchResult) and never stops polling.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("Network error: {0}")]
    Network(HttpError),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

impl From<HttpError> for FetchError {
    fn from(e: HttpError) -> Self {
        match e {
            // A 2xx body that is not JSON at all is a payload problem, not a transport one.
            HttpError::Decode(msg) => FetchError::MalformedResponse(msg),
            other => FetchError::Network(other),
        }
    }
}

/// Errors from the controller's public API.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ControllerError {
    #[error("Controller is not mounted")]
    NotRunning,

    #[error("Input channel full")]
    ChannelFull,
}
