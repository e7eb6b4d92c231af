//! Human-readable business numbers: `PREFIX-YYYYMM-NNNN`.
//!
//! The `NNNN` part comes from a per `(prefix, month)` counter owned by the
//! store, so two generated numbers never collide. A caller-supplied number can
//! still clash with a generated one; callers retry generation up to
//! [`MAX_ATTEMPTS`] times when that happens.

use chrono::{DateTime, Utc};

use crate::store::{ErpStore, StoreResult};

/// Ledger entries.
pub const ENTRY_PREFIX: &str = "JE";
/// Business transactions.
pub const TRANSACTION_PREFIX: &str = "TXN";
/// Receivable invoices.
pub const RECEIVABLE_PREFIX: &str = "INV";
/// Payable invoices.
pub const PAYABLE_PREFIX: &str = "PO";

/// Generation attempts before giving up on a uniqueness conflict.
pub const MAX_ATTEMPTS: u32 = 5;

/// `YYYYMM` period key for `at`.
#[must_use]
pub fn period_key(at: DateTime<Utc>) -> String {
    at.format("%Y%m").to_string()
}

/// Formats a number; sequences above 9999 simply widen.
#[must_use]
pub fn format_number(prefix: &str, period: &str, sequence: u32) -> String {
    format!("{prefix}-{period}-{sequence:04}")
}

/// Draws the next number for `prefix` in the month of `at`.
pub async fn next_number(
    store: &dyn ErpStore,
    prefix: &str,
    at: DateTime<Utc>,
) -> StoreResult<String> {
    let period = period_key(at);
    let sequence = store.next_sequence(prefix, &period).await?;
    Ok(format_number(prefix, &period, sequence))
}
