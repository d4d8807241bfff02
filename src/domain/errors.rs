//! Domain errors for the dashboard.

use thiserror::Error;

/// Errors surfaced to views.
///
/// Cloneable so a failure can be kept alongside a view's last good data.
/// Empty results are not errors and have no variant here.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DashboardError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Fetch failed for {key}: {reason}")]
    FetchFailure { key: String, reason: String },

    #[error("Invalid metric {metric}: {reason}")]
    InvalidMetric { metric: String, reason: String },

    #[error("Invalid matrix: {0}")]
    InvalidMatrix(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Decode error: {0}")]
    Decode(String),
}

impl DashboardError {
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            id: id.into(),
        }
    }

    pub fn invalid_metric(metric: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidMetric {
            metric: metric.into(),
            reason: reason.into(),
        }
    }

    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

pub type DashboardResult<T> = Result<T, DashboardError>;

impl From<serde_json::Error> for DashboardError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}
