//! Domain types for accounts and ledger entries.

use chrono::{DateTime, Utc};
use cogniflow_shared::types::{AccountId, CurrencyCode, LedgerEntryId, TransactionId, UserId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::balance::NormalBalance;

/// Account classification governing the debit/credit sign convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    /// Resources owned.
    Asset,
    /// Obligations owed.
    Liability,
    /// Owner's residual interest.
    Equity,
    /// Income earned.
    Revenue,
    /// Costs incurred.
    Expense,
}

impl AccountType {
    /// All account types in chart-of-accounts order.
    pub const ALL: [Self; 5] = [
        Self::Asset,
        Self::Liability,
        Self::Equity,
        Self::Revenue,
        Self::Expense,
    ];

    /// Lowercase name as stored and serialized.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asset => "asset",
            Self::Liability => "liability",
            Self::Equity => "equity",
            Self::Revenue => "revenue",
            Self::Expense => "expense",
        }
    }

    /// Side that increases this account's balance.
    #[must_use]
    pub const fn normal_balance(self) -> NormalBalance {
        NormalBalance::for_account_type(self)
    }
}

impl std::fmt::Display for AccountType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AccountType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown account type '{s}'"))
    }
}

/// A ledger account with its authoritative running balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    /// Account ID.
    pub id: AccountId,
    /// Unique account name, referenced by ledger entries.
    pub name: String,
    /// Account type.
    #[serde(rename = "type")]
    pub account_type: AccountType,
    /// Opening balance plus every posted entry's signed effect.
    pub balance: Decimal,
    /// Currency code.
    pub currency: CurrencyCode,
    /// Inactive accounts reject new postings.
    pub is_active: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// An immutable debit or credit line posted against one account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerEntry {
    /// Entry ID.
    pub id: LedgerEntryId,
    /// Unique, human-readable entry number (`JE-YYYYMM-NNNN`).
    pub entry_number: String,
    /// Description.
    pub description: String,
    /// Debit amount.
    pub debit: Decimal,
    /// Credit amount.
    pub credit: Decimal,
    /// Name of the account this entry posts to.
    pub account_name: String,
    /// Booking date.
    pub date: DateTime<Utc>,
    /// Originating business transaction, if any.
    pub transaction_id: Option<TransactionId>,
    /// User who posted the entry.
    pub created_by: UserId,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Input for creating an account.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAccount {
    /// Unique account name.
    pub name: String,
    /// Account type.
    #[serde(rename = "type")]
    pub account_type: AccountType,
    /// Opening balance, zero when omitted.
    #[serde(default, alias = "balance")]
    pub opening_balance: Decimal,
    /// Currency, `USD` when omitted.
    #[serde(default)]
    pub currency: CurrencyCode,
}

/// Partial update of an account. The balance is never updatable.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountUpdate {
    /// New name.
    pub name: Option<String>,
    /// New currency.
    pub currency: Option<CurrencyCode>,
    /// Activate or deactivate.
    pub is_active: Option<bool>,
}

/// Input for posting a ledger entry.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewLedgerEntry {
    /// Account to post against.
    pub account_name: String,
    /// Debit amount.
    #[serde(default)]
    pub debit: Decimal,
    /// Credit amount.
    #[serde(default)]
    pub credit: Decimal,
    /// Description.
    pub description: String,
    /// Booking date, now when omitted.
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
    /// Originating business transaction.
    #[serde(default)]
    pub transaction_id: Option<TransactionId>,
    /// Explicit entry number, generated when omitted.
    #[serde(default)]
    pub entry_number: Option<String>,
}

/// Account list filter.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountFilter {
    /// Only accounts of this type.
    #[serde(rename = "type")]
    pub account_type: Option<AccountType>,
    /// Only active (or only inactive) accounts.
    pub is_active: Option<bool>,
}

impl AccountFilter {
    /// Whether an account passes the filter.
    #[must_use]
    pub fn matches(&self, account: &Account) -> bool {
        self.account_type.is_none_or(|t| t == account.account_type)
            && self.is_active.is_none_or(|a| a == account.is_active)
    }
}

/// Ledger entry list filter.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryFilter {
    /// Only entries posted to this account.
    pub account_name: Option<String>,
    /// Only entries linked to this transaction.
    pub transaction_id: Option<TransactionId>,
    /// Maximum number of entries, newest first.
    pub limit: Option<u64>,
}

impl EntryFilter {
    /// Whether an entry passes the equality filters (limit is applied separately).
    #[must_use]
    pub fn matches(&self, entry: &LedgerEntry) -> bool {
        self.account_name
            .as_deref()
            .is_none_or(|n| n == entry.account_name)
            && self
                .transaction_id
                .is_none_or(|t| entry.transaction_id == Some(t))
    }
}
