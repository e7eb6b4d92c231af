//! Business rule validation for accounts and ledger entries.

use cogniflow_shared::types::check_amount;
use rust_decimal::Decimal;

use super::error::LedgerError;
use super::types::{AccountUpdate, NewAccount, NewLedgerEntry};

/// Validates a new account.
///
/// # Errors
///
/// `EmptyAccountName` for a blank name, `InvalidAmount` for an opening
/// balance storage cannot hold.
pub fn validate_new_account(input: &NewAccount) -> Result<(), LedgerError> {
    if input.name.trim().is_empty() {
        return Err(LedgerError::EmptyAccountName);
    }
    check_amount(input.opening_balance)?;
    Ok(())
}

/// Validates an account update.
///
/// # Errors
///
/// Returns `LedgerError::EmptyAccountName` when renaming to a blank name.
pub fn validate_account_update(update: &AccountUpdate) -> Result<(), LedgerError> {
    if update.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
        return Err(LedgerError::EmptyAccountName);
    }
    Ok(())
}

/// Validates a single ledger line.
///
/// Both amounts must be non-negative and exactly one of them non-zero.
///
/// # Errors
///
/// Returns the first rule the entry breaks.
pub fn validate_entry(input: &NewLedgerEntry) -> Result<(), LedgerError> {
    if input.account_name.trim().is_empty() {
        return Err(LedgerError::EmptyAccountName);
    }
    if input.description.trim().is_empty() {
        return Err(LedgerError::EmptyDescription);
    }
    if input.entry_number.as_deref().is_some_and(|n| n.trim().is_empty()) {
        return Err(LedgerError::EmptyEntryNumber);
    }
    validate_amounts(input.debit, input.credit)
}

/// Validates the debit/credit pair of an entry.
///
/// # Errors
///
/// Returns `NegativeAmount`, `InvalidAmount`, `ZeroAmount` or `InvalidEntryType`.
pub fn validate_amounts(debit: Decimal, credit: Decimal) -> Result<(), LedgerError> {
    if debit < Decimal::ZERO || credit < Decimal::ZERO {
        return Err(LedgerError::NegativeAmount);
    }
    check_amount(debit)?;
    check_amount(credit)?;
    match (debit.is_zero(), credit.is_zero()) {
        (true, true) => Err(LedgerError::ZeroAmount),
        (false, false) => Err(LedgerError::InvalidEntryType),
        _ => Ok(()),
    }
}
