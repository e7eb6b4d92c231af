//! Insight error types.

use cogniflow_shared::AppError;
use cogniflow_shared::types::InsightId;
use thiserror::Error;

use crate::store::StoreError;

/// Errors that can occur while listing, storing or acknowledging insights.
#[derive(Debug, Error)]
pub enum InsightError {
    /// Insight not found.
    #[error("Insight not found: {0}")]
    NotFound(InsightId),

    /// Store failure.
    #[error("Storage error: {0}")]
    Storage(String),
}

impl InsightError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "INSIGHT_NOT_FOUND",
            Self::Storage(_) => "STORAGE_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            Self::NotFound(_) => 404,
            Self::Storage(_) => 500,
        }
    }
}

impl From<StoreError> for InsightError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound {
                entity: "insight",
                ref key,
            } => key
                .parse()
                .map_or_else(|_| Self::Storage(err.to_string()), Self::NotFound),
            other => Self::Storage(other.to_string()),
        }
    }
}

impl From<InsightError> for AppError {
    fn from(err: InsightError) -> Self {
        match err {
            InsightError::NotFound(_) => Self::NotFound(err.to_string()),
            InsightError::Storage(message) => Self::Database(message),
        }
    }
}
