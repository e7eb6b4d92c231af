//! Persistence boundary for the books.
//!
//! Every service talks to an [`ErpStore`]. Two implementations exist: the
//! [`MemoryStore`] here (tests, demo mode) and the PostgreSQL store in the db
//! crate. Both guarantee:
//!
//! - uniqueness of account names, entry/transaction/invoice numbers and
//!   insight dedup keys, with a failed insert leaving state untouched
//! - [`ErpStore::post_entry`] records the entry and applies its balance change
//!   as one atomic step, so concurrent postings never lose updates
//! - list queries newest first (accounts by name), equality filters only

mod error;
mod memory;

use std::sync::Arc;

use async_trait::async_trait;
use cogniflow_shared::types::{AccountId, InsightId, InvoiceId, LedgerEntryId, TransactionId};

use crate::audit::{AuditFilter, AuditLog};
use crate::insights::{AiInsight, InsightFilter};
use crate::ledger::{Account, AccountFilter, AccountUpdate, EntryFilter, LedgerEntry};
use crate::records::{Invoice, InvoiceFilter, Transaction, TransactionFilter};

pub use error::StoreError;
pub use memory::MemoryStore;

/// Shared handle to the process-wide store.
pub type SharedStore = Arc<dyn ErpStore>;

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Storage primitives used by the core services.
#[async_trait]
pub trait ErpStore: Send + Sync {
    // ========== Accounts ==========

    /// Inserts a new account. Fails with `Duplicate` if the name is taken.
    async fn insert_account(&self, account: Account) -> StoreResult<Account>;

    /// Finds an account by id.
    async fn find_account(&self, id: AccountId) -> StoreResult<Option<Account>>;

    /// Finds an account by its unique name.
    async fn find_account_by_name(&self, name: &str) -> StoreResult<Option<Account>>;

    /// Lists accounts ordered by name.
    async fn list_accounts(&self, filter: &AccountFilter) -> StoreResult<Vec<Account>>;

    /// Applies a partial update; never touches the balance.
    async fn update_account(&self, id: AccountId, update: &AccountUpdate) -> StoreResult<Account>;

    // ========== Ledger entries ==========

    /// Records `entry` and adds its signed effect to the named account in one
    /// atomic step. Nothing is written when the account is missing or
    /// inactive, or the entry number is taken.
    ///
    /// Returns the stored entry and the account as it stands after posting.
    async fn post_entry(&self, entry: LedgerEntry) -> StoreResult<(LedgerEntry, Account)>;

    /// Finds a ledger entry by id.
    async fn find_entry(&self, id: LedgerEntryId) -> StoreResult<Option<LedgerEntry>>;

    /// Lists ledger entries, newest first.
    async fn list_entries(&self, filter: &EntryFilter) -> StoreResult<Vec<LedgerEntry>>;

    // ========== Transactions ==========

    /// Inserts a transaction. Fails with `Duplicate` on a reused number.
    async fn insert_transaction(&self, transaction: Transaction) -> StoreResult<Transaction>;

    /// Finds a transaction by id.
    async fn find_transaction(&self, id: TransactionId) -> StoreResult<Option<Transaction>>;

    /// Lists transactions, newest first.
    async fn list_transactions(&self, filter: &TransactionFilter) -> StoreResult<Vec<Transaction>>;

    /// Replaces the mutable fields of an existing transaction.
    async fn update_transaction(&self, transaction: Transaction) -> StoreResult<Transaction>;

    // ========== Invoices ==========

    /// Inserts an invoice. Fails with `Duplicate` on a reused number.
    async fn insert_invoice(&self, invoice: Invoice) -> StoreResult<Invoice>;

    /// Finds an invoice by id.
    async fn find_invoice(&self, id: InvoiceId) -> StoreResult<Option<Invoice>>;

    /// Lists invoices, newest issue date first.
    async fn list_invoices(&self, filter: &InvoiceFilter) -> StoreResult<Vec<Invoice>>;

    /// Replaces the mutable fields of an existing invoice.
    async fn update_invoice(&self, invoice: Invoice) -> StoreResult<Invoice>;

    // ========== Insights ==========

    /// Inserts an insight unless one with the same dedup key exists.
    ///
    /// Returns `false` when the insight was suppressed as a duplicate.
    async fn insert_insight_if_absent(&self, insight: AiInsight) -> StoreResult<bool>;

    /// Finds an insight by id.
    async fn find_insight(&self, id: InsightId) -> StoreResult<Option<AiInsight>>;

    /// Lists insights, newest first.
    async fn list_insights(&self, filter: &InsightFilter) -> StoreResult<Vec<AiInsight>>;

    /// Flags an insight as read.
    async fn mark_insight_read(&self, id: InsightId) -> StoreResult<AiInsight>;

    // ========== Audit trail ==========

    /// Appends an audit record.
    async fn append_audit(&self, log: AuditLog) -> StoreResult<()>;

    /// Lists audit records, newest first.
    async fn list_audit_logs(&self, filter: &AuditFilter) -> StoreResult<Vec<AuditLog>>;

    // ========== Numbering ==========

    /// Returns the next value of the monotonic counter for `(prefix, period)`,
    /// starting at 1.
    async fn next_sequence(&self, prefix: &str, period: &str) -> StoreResult<u32>;
}

/// Applies an optional `limit` to an already ordered list.
pub(crate) fn apply_limit<T>(mut items: Vec<T>, limit: Option<u64>) -> Vec<T> {
    if let Some(limit) = limit {
        items.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
    }
    items
}
