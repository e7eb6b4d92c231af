//! Transaction and invoice error types.

use cogniflow_shared::AppError;
use cogniflow_shared::types::{AmountError, InvoiceId, TransactionId};
use thiserror::Error;

use crate::store::StoreError;

/// Errors that can occur while recording transactions and invoices.
#[derive(Debug, Error)]
pub enum RecordError {
    // ========== Validation Errors ==========
    /// Description is blank.
    #[error("Description cannot be empty")]
    EmptyDescription,

    /// Category is blank.
    #[error("Category cannot be empty")]
    EmptyCategory,

    /// Client name is blank.
    #[error("Client name cannot be empty")]
    EmptyClientName,

    /// Amount breaks the sign rule for its type.
    #[error("Amount must be positive")]
    NonPositiveAmount,

    /// Adjustment of zero.
    #[error("Adjustment amount cannot be zero")]
    ZeroAdjustment,

    /// Amount cannot be stored exactly.
    #[error("Invalid amount: {0}")]
    InvalidAmount(#[from] AmountError),

    /// Supplied number is blank.
    #[error("{entity} number cannot be blank")]
    EmptyNumber {
        /// `transaction` or `invoice`.
        entity: &'static str,
    },

    /// Due date precedes issue date.
    #[error("Due date cannot be before issue date")]
    DueBeforeIssue,

    /// Status change not allowed.
    #[error("Cannot change status from {from} to {to}")]
    InvalidTransition {
        /// Current status.
        from: &'static str,
        /// Requested status.
        to: &'static str,
    },

    // ========== Lookup Errors ==========
    /// Transaction not found.
    #[error("Transaction not found: {0}")]
    TransactionNotFound(TransactionId),

    /// Invoice not found.
    #[error("Invoice not found: {0}")]
    InvoiceNotFound(InvoiceId),

    // ========== Uniqueness Errors ==========
    /// Number already used.
    #[error("{entity} number already exists: {number}")]
    DuplicateNumber {
        /// `transaction` or `invoice`.
        entity: &'static str,
        /// Conflicting number.
        number: String,
    },

    // ========== Storage Errors ==========
    /// Store failure.
    #[error("Storage error: {0}")]
    Storage(String),
}

impl RecordError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::EmptyDescription => "EMPTY_DESCRIPTION",
            Self::EmptyCategory => "EMPTY_CATEGORY",
            Self::EmptyClientName => "EMPTY_CLIENT_NAME",
            Self::NonPositiveAmount => "NON_POSITIVE_AMOUNT",
            Self::ZeroAdjustment => "ZERO_ADJUSTMENT",
            Self::InvalidAmount(_) => "INVALID_AMOUNT",
            Self::EmptyNumber { .. } => "EMPTY_NUMBER",
            Self::DueBeforeIssue => "DUE_BEFORE_ISSUE",
            Self::InvalidTransition { .. } => "INVALID_STATUS_TRANSITION",
            Self::TransactionNotFound(_) => "TRANSACTION_NOT_FOUND",
            Self::InvoiceNotFound(_) => "INVOICE_NOT_FOUND",
            Self::DuplicateNumber { .. } => "DUPLICATE_NUMBER",
            Self::Storage(_) => "STORAGE_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            Self::EmptyDescription
            | Self::EmptyCategory
            | Self::EmptyClientName
            | Self::NonPositiveAmount
            | Self::ZeroAdjustment
            | Self::InvalidAmount(_)
            | Self::EmptyNumber { .. }
            | Self::DueBeforeIssue
            | Self::InvalidTransition { .. } => 400,
            Self::TransactionNotFound(_) | Self::InvoiceNotFound(_) => 404,
            Self::DuplicateNumber { .. } => 409,
            Self::Storage(_) => 500,
        }
    }
}

impl From<StoreError> for RecordError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Duplicate {
                entity: entity @ ("transaction" | "invoice"),
                key,
            } => Self::DuplicateNumber {
                entity,
                number: key,
            },
            other => Self::Storage(other.to_string()),
        }
    }
}

impl From<RecordError> for AppError {
    fn from(err: RecordError) -> Self {
        let message = err.to_string();
        match err.http_status_code() {
            400 => Self::Validation(message),
            404 => Self::NotFound(message),
            409 => Self::Conflict(message),
            _ => Self::Database(message),
        }
    }
}
