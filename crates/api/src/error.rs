//! JSON error responses.
//!
//! Every failure leaves the API as `{"error": CODE, "message": ...}` with the
//! status taken from the originating error. Server-side failures are logged
//! and answered with a generic message.

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use cogniflow_core::insights::InsightError;
use cogniflow_core::ledger::LedgerError;
use cogniflow_core::records::RecordError;
use cogniflow_core::reports::ReportError;
use cogniflow_core::store::StoreError;
use cogniflow_shared::AppError;
use serde_json::json;

/// Error returned by route handlers.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    code: &'static str,
    message: String,
}

impl ApiError {
    fn new(status: u16, code: &'static str, message: String) -> Self {
        Self {
            status: StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            code,
            message,
        }
    }

    /// 403 for a role that may not perform `action`.
    #[must_use]
    pub fn forbidden(action: &str) -> Self {
        AppError::Forbidden(format!("your role may not {action}")).into()
    }

    /// Response status.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Machine-readable error code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        self.code
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self::new(err.status_code(), err.error_code(), err.to_string())
    }
}

macro_rules! domain_error {
    ($($error:ty),+ $(,)?) => {
        $(
            impl From<$error> for ApiError {
                fn from(err: $error) -> Self {
                    Self::new(err.http_status_code(), err.error_code(), err.to_string())
                }
            }
        )+
    };
}

domain_error!(LedgerError, RecordError, ReportError, InsightError);

macro_rules! rejection_error {
    ($($rejection:ty),+ $(,)?) => {
        $(
            impl From<$rejection> for ApiError {
                fn from(rejection: $rejection) -> Self {
                    AppError::Validation(rejection.body_text()).into()
                }
            }
        )+
    };
}

// Extractor rejections answer 400 VALIDATION_ERROR whatever axum would have sent.
rejection_error!(JsonRejection, PathRejection, QueryRejection);

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        let app = match &err {
            StoreError::Duplicate { .. } => AppError::Conflict(err.to_string()),
            StoreError::NotFound { .. } => AppError::NotFound(err.to_string()),
            StoreError::AccountInactive(_) => AppError::Validation(err.to_string()),
            StoreError::Backend(_) => AppError::Database(err.to_string()),
        };
        app.into()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = if self.status.is_server_error() {
            tracing::error!(code = self.code, error = %self.message, "Request failed");
            "An internal error occurred".to_string()
        } else {
            self.message
        };

        (
            self.status,
            Json(json!({ "error": self.code, "message": message })),
        )
            .into_response()
    }
}
