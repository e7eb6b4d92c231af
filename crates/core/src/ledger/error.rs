//! Ledger error types for validation and state errors.

use cogniflow_shared::AppError;
use cogniflow_shared::types::{AccountId, AmountError, LedgerEntryId};
use thiserror::Error;

use crate::store::StoreError;

/// Errors that can occur during ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    // ========== Validation Errors ==========
    /// Account name is blank.
    #[error("Account name cannot be empty")]
    EmptyAccountName,

    /// Entry description is blank.
    #[error("Entry description cannot be empty")]
    EmptyDescription,

    /// Entry amount cannot be negative.
    #[error("Entry amounts cannot be negative")]
    NegativeAmount,

    /// Neither debit nor credit is set.
    #[error("Entry must have a non-zero debit or credit")]
    ZeroAmount,

    /// Both debit and credit are set.
    #[error("Entry must specify either debit or credit, not both")]
    InvalidEntryType,

    /// Amount cannot be stored exactly.
    #[error("Invalid amount: {0}")]
    InvalidAmount(#[from] AmountError),

    /// Supplied entry number is blank.
    #[error("Entry number cannot be blank")]
    EmptyEntryNumber,

    /// Posting to a deactivated account.
    #[error("Account '{0}' is inactive")]
    AccountInactive(String),

    // ========== Lookup Errors ==========
    /// Account not found by name.
    #[error("Account not found: {0}")]
    AccountNotFound(String),

    /// Account not found by id.
    #[error("Account not found: {0}")]
    AccountIdNotFound(AccountId),

    /// Ledger entry not found.
    #[error("Ledger entry not found: {0}")]
    EntryNotFound(LedgerEntryId),

    // ========== Uniqueness Errors ==========
    /// Account name already taken.
    #[error("Account name already exists: {0}")]
    DuplicateAccountName(String),

    /// Entry number already used.
    #[error("Entry number already exists: {0}")]
    DuplicateEntryNumber(String),

    // ========== Storage Errors ==========
    /// Store failure.
    #[error("Storage error: {0}")]
    Storage(String),
}

impl LedgerError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::EmptyAccountName => "EMPTY_ACCOUNT_NAME",
            Self::EmptyDescription => "EMPTY_DESCRIPTION",
            Self::NegativeAmount => "NEGATIVE_AMOUNT",
            Self::ZeroAmount => "ZERO_AMOUNT",
            Self::InvalidEntryType => "INVALID_ENTRY_TYPE",
            Self::InvalidAmount(_) => "INVALID_AMOUNT",
            Self::EmptyEntryNumber => "EMPTY_ENTRY_NUMBER",
            Self::AccountInactive(_) => "ACCOUNT_INACTIVE",
            Self::AccountNotFound(_) | Self::AccountIdNotFound(_) => "ACCOUNT_NOT_FOUND",
            Self::EntryNotFound(_) => "ENTRY_NOT_FOUND",
            Self::DuplicateAccountName(_) => "DUPLICATE_ACCOUNT_NAME",
            Self::DuplicateEntryNumber(_) => "DUPLICATE_ENTRY_NUMBER",
            Self::Storage(_) => "STORAGE_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            // 400 Bad Request - validation errors
            Self::EmptyAccountName
            | Self::EmptyDescription
            | Self::NegativeAmount
            | Self::ZeroAmount
            | Self::InvalidEntryType
            | Self::InvalidAmount(_)
            | Self::EmptyEntryNumber
            | Self::AccountInactive(_) => 400,

            // 404 Not Found
            Self::AccountNotFound(_) | Self::AccountIdNotFound(_) | Self::EntryNotFound(_) => 404,

            // 409 Conflict
            Self::DuplicateAccountName(_) | Self::DuplicateEntryNumber(_) => 409,

            // 500 Internal Server Error
            Self::Storage(_) => 500,
        }
    }
}

impl From<StoreError> for LedgerError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Duplicate { entity: "account", key } => Self::DuplicateAccountName(key),
            StoreError::Duplicate {
                entity: "ledger entry",
                key,
            } => Self::DuplicateEntryNumber(key),
            StoreError::NotFound {
                entity: "account",
                key,
            } => Self::AccountNotFound(key),
            StoreError::AccountInactive(name) => Self::AccountInactive(name),
            other => Self::Storage(other.to_string()),
        }
    }
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        let message = err.to_string();
        match err.http_status_code() {
            400 => Self::Validation(message),
            404 => Self::NotFound(message),
            409 => Self::Conflict(message),
            _ => Self::Database(message),
        }
    }
}
