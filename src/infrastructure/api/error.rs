use thiserror::Error;

use crate::domain::errors::DashboardError;

/// Errors that can occur when talking to the analytical service
#[derive(Error, Debug)]
pub enum ApiError {
    /// Request rejected as malformed (400/422)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Requested entity does not exist (404)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rate limit exceeded (429)
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Service returned a 5xx
    #[error("Server error ({status}): {body}")]
    ServerError { status: u16, body: String },

    /// Network error occurred during request
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    /// Response body did not match the expected shape
    #[error("JSON deserialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// Any other unexpected status
    #[error("Unexpected status {status}: {body}")]
    Unexpected { status: u16, body: String },
}

impl ApiError {
    /// Returns true if this error is transient and worth one more attempt
    ///
    /// Transient errors include:
    /// - Rate limit exceeded
    /// - Server errors (5xx)
    /// - Network errors (connect, timeout)
    pub fn is_transient(&self) -> bool {
        match self {
            Self::RateLimitExceeded | Self::ServerError { .. } => true,
            Self::NetworkError(err) => !err.is_decode() && !err.is_builder(),
            _ => false,
        }
    }

    /// Map a non-success HTTP status and body to an error
    pub fn from_status(status: reqwest::StatusCode, body: String) -> Self {
        match status.as_u16() {
            400 | 422 => Self::InvalidRequest(body),
            404 => Self::NotFound(body),
            429 => Self::RateLimitExceeded,
            500..=599 => Self::ServerError {
                status: status.as_u16(),
                body,
            },
            other => Self::Unexpected {
                status: other,
                body,
            },
        }
    }

    /// Convert into the domain taxonomy for the resource at `key`
    pub fn into_dashboard(self, entity: &'static str, key: &str, id: &str) -> DashboardError {
        match self {
            Self::NotFound(_) => DashboardError::not_found(entity, id),
            Self::InvalidRequest(body) => DashboardError::InvalidRequest(body),
            Self::SerializationError(err) => DashboardError::Decode(err.to_string()),
            other => DashboardError::FetchFailure {
                key: key.to_string(),
                reason: other.to_string(),
            },
        }
    }
}
