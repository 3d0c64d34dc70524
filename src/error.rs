//! Custom error types for release-scribe.

use thiserror::Error;

/// Main error type for release-scribe operations.
#[derive(Error, Debug)]
pub enum ScribeError {
    // Configuration errors
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Missing API credential: pass --api-key or set {0}")]
    MissingCredential(String),

    // History errors
    #[error("Git operation failed: {0}")]
    GitError(#[from] git2::Error),

    // Network/API errors
    #[error("Network request failed: {0}")]
    NetworkError(String),

    #[error("API authentication failed: {0}")]
    AuthenticationError(String),

    #[error("API rate limit exceeded")]
    RateLimitExceeded,

    #[error("Unexpected response from text generation service: {0}")]
    InvalidResponse(String),

    // Changelog persistence errors
    #[error("Changelog operation failed for {path}: {source}")]
    Changelog {
        path: String,
        #[source]
        source: std::io::Error,
    },

    // Automatic conversions via #[from]
    #[error("Regular expression error: {0}")]
    RegexError(#[from] regex::Error),

    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] log::SetLoggerError),
}

/// Result type alias using ScribeError
pub type Result<T> = std::result::Result<T, ScribeError>;

impl ScribeError {
    /// Create an invalid config error
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Create an invalid response error
    pub fn invalid_response(msg: impl Into<String>) -> Self {
        Self::InvalidResponse(msg.into())
    }

    /// Create a changelog persistence error for the given path
    pub fn changelog(
        path: impl AsRef<std::path::Path>,
        source: std::io::Error,
    ) -> Self {
        Self::Changelog {
            path: path.as_ref().display().to_string(),
            source,
        }
    }

    /// Classify a non-success HTTP status returned by the text generation
    /// service, keeping the response body for diagnosis.
    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        match status.as_u16() {
            401 | 403 => Self::AuthenticationError(format!("{status}: {body}")),
            429 => Self::RateLimitExceeded,
            _ => Self::NetworkError(format!("{status}: {body}")),
        }
    }
}

// Implement From for reqwest errors (network/API)
impl From<reqwest::Error> for ScribeError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() || err.is_connect() {
            Self::NetworkError(err.to_string())
        } else if err.is_status() {
            if let Some(status) = err.status() {
                if status.as_u16() == 401 || status.as_u16() == 403 {
                    Self::AuthenticationError(err.to_string())
                } else if status.as_u16() == 429 {
                    Self::RateLimitExceeded
                } else {
                    Self::NetworkError(err.to_string())
                }
            } else {
                Self::NetworkError(err.to_string())
            }
        } else if err.is_decode() {
            Self::InvalidResponse(err.to_string())
        } else {
            Self::NetworkError(err.to_string())
        }
    }
}

// Implement From for reqwest header errors (needs custom message)
impl From<reqwest::header::InvalidHeaderValue> for ScribeError {
    fn from(err: reqwest::header::InvalidHeaderValue) -> Self {
        Self::AuthenticationError(format!("Invalid header value: {}", err))
    }
}
