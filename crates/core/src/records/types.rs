//! Business transactions and invoices.

use chrono::{DateTime, NaiveDate, Utc};
use cogniflow_shared::types::{CurrencyCode, InvoiceId, TransactionId, UserId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::numbering;

// ============================================================================
// Transactions
// ============================================================================

/// Kind of business transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Money in.
    Income,
    /// Money out.
    Expense,
    /// Movement between own accounts.
    Transfer,
    /// Manual correction.
    Adjustment,
}

impl TransactionType {
    /// Lowercase name as stored and serialized.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
            Self::Transfer => "transfer",
            Self::Adjustment => "adjustment",
        }
    }
}

/// Lifecycle of a business transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    /// Recorded, not yet settled.
    Pending,
    /// Settled.
    Completed,
    /// Voided. Terminal.
    Cancelled,
}

impl TransactionStatus {
    /// Lowercase name as stored and serialized.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Whether moving from `self` to `next` is allowed. Staying put always is.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending, _)
                | (Self::Completed, Self::Completed | Self::Cancelled)
                | (Self::Cancelled, Self::Cancelled)
        )
    }
}

/// A recorded business transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Transaction ID.
    pub id: TransactionId,
    /// Unique, human-readable number.
    pub transaction_number: String,
    /// Description.
    pub description: String,
    /// Amount. Positive except for adjustments, which may be negative.
    pub amount: Decimal,
    /// Currency code.
    pub currency: CurrencyCode,
    /// Transaction type.
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// Free-text category.
    pub category: String,
    /// Status.
    pub status: TransactionStatus,
    /// Business date.
    pub date: DateTime<Utc>,
    /// Recording user.
    pub created_by: UserId,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    /// Cancelled transactions are excluded from every aggregate.
    #[must_use]
    pub fn counts(&self) -> bool {
        self.status != TransactionStatus::Cancelled
    }

    /// Business date without time of day.
    #[must_use]
    pub fn day(&self) -> NaiveDate {
        self.date.date_naive()
    }
}

/// Input for recording a transaction.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTransaction {
    /// Explicit number, generated when omitted.
    #[serde(default)]
    pub transaction_number: Option<String>,
    /// Description.
    pub description: String,
    /// Amount.
    pub amount: Decimal,
    /// Currency, `USD` when omitted.
    #[serde(default)]
    pub currency: CurrencyCode,
    /// Transaction type.
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// Free-text category.
    pub category: String,
    /// Initial status, pending when omitted.
    #[serde(default)]
    pub status: Option<TransactionStatus>,
    /// Business date, now when omitted.
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
}

/// Partial update of a transaction.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionUpdate {
    /// New description.
    pub description: Option<String>,
    /// New category.
    pub category: Option<String>,
    /// New status, subject to the transition rules.
    pub status: Option<TransactionStatus>,
    /// New business date.
    pub date: Option<DateTime<Utc>>,
}

/// Transaction list filter.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionFilter {
    /// Only this type.
    #[serde(rename = "type")]
    pub transaction_type: Option<TransactionType>,
    /// Only this status.
    pub status: Option<TransactionStatus>,
    /// Only this category.
    pub category: Option<String>,
    /// Dated at or after.
    pub from: Option<DateTime<Utc>>,
    /// Dated at or before.
    pub to: Option<DateTime<Utc>>,
    /// Maximum number of rows, newest first.
    pub limit: Option<u64>,
}

impl TransactionFilter {
    /// Whether a transaction passes the equality/range filters.
    #[must_use]
    pub fn matches(&self, tx: &Transaction) -> bool {
        self.transaction_type.is_none_or(|t| t == tx.transaction_type)
            && self.status.is_none_or(|s| s == tx.status)
            && self.category.as_deref().is_none_or(|c| c == tx.category)
            && self.from.is_none_or(|from| tx.date >= from)
            && self.to.is_none_or(|to| tx.date <= to)
    }
}

// ============================================================================
// Invoices
// ============================================================================

/// Direction of an invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceType {
    /// Owed to us by a client.
    AccountsReceivable,
    /// Owed by us to a supplier.
    AccountsPayable,
}

impl InvoiceType {
    /// Stored name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AccountsReceivable => "accounts_receivable",
            Self::AccountsPayable => "accounts_payable",
        }
    }

    /// Prefix of generated invoice numbers.
    #[must_use]
    pub const fn number_prefix(self) -> &'static str {
        match self {
            Self::AccountsReceivable => numbering::RECEIVABLE_PREFIX,
            Self::AccountsPayable => numbering::PAYABLE_PREFIX,
        }
    }
}

/// Invoice lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    /// Awaiting payment.
    Pending,
    /// Settled. Terminal.
    Paid,
    /// Past due and unpaid.
    Overdue,
    /// Voided. Terminal.
    Cancelled,
}

impl InvoiceStatus {
    /// Stored name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Paid => "paid",
            Self::Overdue => "overdue",
            Self::Cancelled => "cancelled",
        }
    }

    /// Paid and cancelled invoices no longer change.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Paid | Self::Cancelled)
    }

    /// Whether moving from `self` to `next` is allowed. Staying put always is.
    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        self == next || !self.is_terminal()
    }
}

/// A receivable or payable invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    /// Invoice ID.
    pub id: InvoiceId,
    /// Unique, human-readable number.
    pub invoice_number: String,
    /// Client or supplier name.
    pub client_name: String,
    /// Amount.
    pub amount: Decimal,
    /// Currency code.
    pub currency: CurrencyCode,
    /// Issue date.
    pub issue_date: DateTime<Utc>,
    /// Due date.
    pub due_date: DateTime<Utc>,
    /// Stored status; see [`Invoice::effective_status`].
    pub status: InvoiceStatus,
    /// Receivable or payable.
    #[serde(rename = "type")]
    pub invoice_type: InvoiceType,
    /// Free-text notes.
    pub notes: Option<String>,
    /// Recording user.
    pub created_by: UserId,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Invoice {
    /// Status as of `today`: a pending invoice past its due date is overdue.
    #[must_use]
    pub fn effective_status(&self, today: NaiveDate) -> InvoiceStatus {
        if self.status == InvoiceStatus::Pending && self.due_date.date_naive() < today {
            InvoiceStatus::Overdue
        } else {
            self.status
        }
    }

    /// Copy with the stored status replaced by the effective one.
    #[must_use]
    pub fn as_of(mut self, today: NaiveDate) -> Self {
        self.status = self.effective_status(today);
        self
    }
}

/// Input for recording an invoice.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewInvoice {
    /// Explicit number, generated when omitted.
    #[serde(default)]
    pub invoice_number: Option<String>,
    /// Client or supplier name.
    pub client_name: String,
    /// Amount.
    pub amount: Decimal,
    /// Currency, `USD` when omitted.
    #[serde(default)]
    pub currency: CurrencyCode,
    /// Issue date, now when omitted.
    #[serde(default)]
    pub issue_date: Option<DateTime<Utc>>,
    /// Due date.
    pub due_date: DateTime<Utc>,
    /// Receivable or payable.
    #[serde(rename = "type")]
    pub invoice_type: InvoiceType,
    /// Free-text notes.
    #[serde(default)]
    pub notes: Option<String>,
}

/// Partial update of an invoice.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceUpdate {
    /// New client name.
    pub client_name: Option<String>,
    /// New due date.
    pub due_date: Option<DateTime<Utc>>,
    /// New status, subject to the transition rules.
    pub status: Option<InvoiceStatus>,
    /// New notes.
    pub notes: Option<String>,
}

/// Invoice list filter.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceFilter {
    /// Only this direction.
    #[serde(rename = "type")]
    pub invoice_type: Option<InvoiceType>,
    /// Only this stored status.
    pub status: Option<InvoiceStatus>,
    /// Maximum number of rows, newest first.
    pub limit: Option<u64>,
}

impl InvoiceFilter {
    /// Whether an invoice passes the equality filters.
    #[must_use]
    pub fn matches(&self, invoice: &Invoice) -> bool {
        self.invoice_type.is_none_or(|t| t == invoice.invoice_type)
            && self.status.is_none_or(|s| s == invoice.status)
    }
}
