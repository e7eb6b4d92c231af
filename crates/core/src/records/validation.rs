//! Business rule validation for transactions and invoices.

use chrono::{DateTime, Utc};
use cogniflow_shared::types::check_amount;
use rust_decimal::Decimal;

use super::error::RecordError;
use super::types::{
    InvoiceStatus, InvoiceUpdate, NewInvoice, NewTransaction, TransactionStatus, TransactionType,
    TransactionUpdate,
};

/// Validates a new transaction.
///
/// # Errors
///
/// Returns the first rule the input breaks.
pub fn validate_new_transaction(input: &NewTransaction) -> Result<(), RecordError> {
    if input.description.trim().is_empty() {
        return Err(RecordError::EmptyDescription);
    }
    if input.category.trim().is_empty() {
        return Err(RecordError::EmptyCategory);
    }
    validate_supplied_number("transaction", input.transaction_number.as_deref())?;
    validate_amount(input.transaction_type, input.amount)
}

/// A caller-supplied business number may be omitted but not blank.
///
/// # Errors
///
/// `EmptyNumber` for a whitespace-only number.
pub fn validate_supplied_number(entity: &'static str, number: Option<&str>) -> Result<(), RecordError> {
    if number.is_some_and(|n| n.trim().is_empty()) {
        return Err(RecordError::EmptyNumber { entity });
    }
    Ok(())
}

/// Income, expense and transfer amounts are positive; adjustments may go
/// either way but not be zero.
///
/// # Errors
///
/// `InvalidAmount`, `NonPositiveAmount` or `ZeroAdjustment`.
pub fn validate_amount(kind: TransactionType, amount: Decimal) -> Result<(), RecordError> {
    check_amount(amount)?;
    match kind {
        TransactionType::Adjustment if amount.is_zero() => Err(RecordError::ZeroAdjustment),
        TransactionType::Adjustment => Ok(()),
        _ if amount <= Decimal::ZERO => Err(RecordError::NonPositiveAmount),
        _ => Ok(()),
    }
}

/// Validates a transaction update against its current status.
///
/// # Errors
///
/// Blank fields or a forbidden status change.
pub fn validate_transaction_update(
    current: TransactionStatus,
    update: &TransactionUpdate,
) -> Result<(), RecordError> {
    if update.description.as_deref().is_some_and(|d| d.trim().is_empty()) {
        return Err(RecordError::EmptyDescription);
    }
    if update.category.as_deref().is_some_and(|c| c.trim().is_empty()) {
        return Err(RecordError::EmptyCategory);
    }
    match update.status {
        Some(next) if !current.can_transition_to(next) => Err(RecordError::InvalidTransition {
            from: current.as_str(),
            to: next.as_str(),
        }),
        _ => Ok(()),
    }
}

/// Validates a new invoice once its issue date is known.
///
/// # Errors
///
/// Returns the first rule the input breaks.
pub fn validate_new_invoice(
    input: &NewInvoice,
    issue_date: DateTime<Utc>,
) -> Result<(), RecordError> {
    if input.client_name.trim().is_empty() {
        return Err(RecordError::EmptyClientName);
    }
    validate_supplied_number("invoice", input.invoice_number.as_deref())?;
    check_amount(input.amount)?;
    if input.amount <= Decimal::ZERO {
        return Err(RecordError::NonPositiveAmount);
    }
    if input.due_date < issue_date {
        return Err(RecordError::DueBeforeIssue);
    }
    Ok(())
}

/// Validates an invoice update against its stored status and issue date.
///
/// # Errors
///
/// Blank client name, due date before issue, or a forbidden status change.
pub fn validate_invoice_update(
    current: InvoiceStatus,
    issue_date: DateTime<Utc>,
    update: &InvoiceUpdate,
) -> Result<(), RecordError> {
    if update.client_name.as_deref().is_some_and(|c| c.trim().is_empty()) {
        return Err(RecordError::EmptyClientName);
    }
    if update.due_date.is_some_and(|due| due < issue_date) {
        return Err(RecordError::DueBeforeIssue);
    }
    match update.status {
        Some(next) if !current.can_transition_to(next) => Err(RecordError::InvalidTransition {
            from: current.as_str(),
            to: next.as_str(),
        }),
        _ => Ok(()),
    }
}
