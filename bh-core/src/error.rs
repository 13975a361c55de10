//! Error types for the Bullhorn client.
//!
//! Every failure a caller can observe is a variant of `BhError`. The four
//! variants callers usually branch on are `AuthFailed`, `Validation`,
//! `RetryExhausted` and `ClientError`; the remaining variants describe the
//! individual transient causes and local setup problems.

use thiserror::Error;

/// Convenience type alias for Results using BhError.
pub type BhResult<T> = Result<T, BhError>;

/// Unified error type for the Bullhorn client.
#[derive(Error, Debug)]
pub enum BhError {
    // -- Configuration errors --
    /// Failed to load or parse configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// A required configuration value is missing.
    #[error("missing configuration: {0}")]
    MissingConfig(String),

    // -- Network errors (transient) --
    /// HTTP transport failure (connection refused, reset, body read error).
    #[error("http error: {0}")]
    Http(String),

    /// A single request attempt exceeded its timeout.
    #[error("request timeout: {0}")]
    Timeout(String),

    /// Server returned a 5xx response.
    #[error("server error (status {status}): {message}")]
    ServerError {
        /// HTTP status code.
        status: u16,
        /// Error message from server.
        message: String,
    },

    /// Server returned 429 Too Many Requests.
    #[error("rate limited: {0}")]
    RateLimited(String),

    // -- Terminal API errors --
    /// The session token is invalid, expired, or empty.
    #[error("authentication failed: {0}")]
    AuthFailed(String),

    /// The server answered with a body that does not have the expected shape.
    #[error("invalid response: {0}")]
    Validation(String),

    /// A non-retryable 4xx response.
    #[error("client error (status {status}, code {code}): {message}")]
    ClientError {
        /// HTTP status code.
        status: u16,
        /// Bullhorn error code from the body, 0 when absent.
        code: i64,
        /// Error message from the body.
        message: String,
    },

    /// Transient failures persisted through every allowed attempt.
    #[error("gave up after {attempts} attempts: {last}")]
    RetryExhausted {
        /// Number of attempts made.
        attempts: u32,
        /// The transient failure seen on the final attempt.
        #[source]
        last: Box<BhError>,
    },

    // -- File/IO errors --
    /// File system operation failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl BhError {
    /// Whether this failure may succeed if the request is sent again.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            BhError::Http(_)
                | BhError::Timeout(_)
                | BhError::ServerError { .. }
                | BhError::RateLimited(_)
        )
    }

    /// HTTP status attached to this error, if the server produced one.
    pub fn status(&self) -> Option<u16> {
        match self {
            BhError::ServerError { status, .. } | BhError::ClientError { status, .. } => {
                Some(*status)
            }
            BhError::RateLimited(_) => Some(429),
            BhError::RetryExhausted { last, .. } => last.status(),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for BhError {
    fn from(e: serde_json::Error) -> Self {
        BhError::Serialization(e.to_string())
    }
}

impl From<toml::de::Error> for BhError {
    fn from(e: toml::de::Error) -> Self {
        BhError::Config(e.to_string())
    }
}
