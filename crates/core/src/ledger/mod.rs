//! Double-entry bookkeeping logic.
//!
//! This module implements the ledger store component:
//! - Accounts with authoritative running balances
//! - Immutable ledger entries (debits and credits)
//! - The debit-normal / credit-normal sign rule
//! - Entry validation and atomic posting

pub mod balance;
pub mod error;
pub mod service;
pub mod types;
pub mod validation;

pub use balance::{NormalBalance, balance_change};
pub use error::LedgerError;
pub use service::{LedgerService, PostedEntry};
pub use types::{
    Account, AccountFilter, AccountType, AccountUpdate, EntryFilter, LedgerEntry, NewAccount,
    NewLedgerEntry,
};
