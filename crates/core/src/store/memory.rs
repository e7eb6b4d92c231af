//! In-memory store.
//!
//! All state sits behind one `tokio::sync::RwLock`; every mutation, posting
//! included, runs inside a single write guard, which makes each operation
//! atomic and serializes concurrent postings.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use cogniflow_shared::types::{AccountId, InsightId, InvoiceId, LedgerEntryId, TransactionId};
use tokio::sync::RwLock;

use super::{ErpStore, StoreError, StoreResult, apply_limit};
use crate::audit::{AuditFilter, AuditLog};
use crate::insights::{AiInsight, InsightFilter};
use crate::ledger::{Account, AccountFilter, AccountUpdate, EntryFilter, LedgerEntry, balance_change};
use crate::records::{Invoice, InvoiceFilter, Transaction, TransactionFilter};

#[derive(Debug, Default)]
struct State {
    accounts: HashMap<AccountId, Account>,
    account_names: HashMap<String, AccountId>,
    entries: Vec<LedgerEntry>,
    entry_numbers: HashSet<String>,
    transactions: HashMap<TransactionId, Transaction>,
    transaction_numbers: HashSet<String>,
    invoices: HashMap<InvoiceId, Invoice>,
    invoice_numbers: HashSet<String>,
    insights: Vec<AiInsight>,
    insight_keys: HashSet<String>,
    audit_logs: Vec<AuditLog>,
    sequences: HashMap<(String, String), u32>,
}

/// Process-local store for tests and demo mode.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<State>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ErpStore for MemoryStore {
    async fn insert_account(&self, account: Account) -> StoreResult<Account> {
        let mut state = self.state.write().await;
        if state.account_names.contains_key(&account.name) {
            return Err(StoreError::duplicate("account", account.name));
        }
        state.account_names.insert(account.name.clone(), account.id);
        state.accounts.insert(account.id, account.clone());
        Ok(account)
    }

    async fn find_account(&self, id: AccountId) -> StoreResult<Option<Account>> {
        Ok(self.state.read().await.accounts.get(&id).cloned())
    }

    async fn find_account_by_name(&self, name: &str) -> StoreResult<Option<Account>> {
        let state = self.state.read().await;
        Ok(state
            .account_names
            .get(name)
            .and_then(|id| state.accounts.get(id))
            .cloned())
    }

    async fn list_accounts(&self, filter: &AccountFilter) -> StoreResult<Vec<Account>> {
        let state = self.state.read().await;
        let mut accounts: Vec<Account> = state
            .accounts
            .values()
            .filter(|a| filter.matches(a))
            .cloned()
            .collect();
        accounts.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(accounts)
    }

    async fn update_account(&self, id: AccountId, update: &AccountUpdate) -> StoreResult<Account> {
        let mut state = self.state.write().await;
        let current_name = state
            .accounts
            .get(&id)
            .map(|a| a.name.clone())
            .ok_or_else(|| StoreError::not_found("account", id))?;

        if let Some(name) = update.name.as_ref().filter(|n| **n != current_name) {
            if state.account_names.contains_key(name) {
                return Err(StoreError::duplicate("account", name.clone()));
            }
            state.account_names.remove(&current_name);
            state.account_names.insert(name.clone(), id);
            // Entries follow their account across a rename.
            for entry in state
                .entries
                .iter_mut()
                .filter(|e| e.account_name == current_name)
            {
                entry.account_name.clone_from(name);
            }
        }

        let account = state
            .accounts
            .get_mut(&id)
            .ok_or_else(|| StoreError::not_found("account", id))?;
        if let Some(name) = &update.name {
            account.name.clone_from(name);
        }
        if let Some(currency) = &update.currency {
            account.currency = currency.clone();
        }
        if let Some(is_active) = update.is_active {
            account.is_active = is_active;
        }
        Ok(account.clone())
    }

    async fn post_entry(&self, entry: LedgerEntry) -> StoreResult<(LedgerEntry, Account)> {
        let mut state = self.state.write().await;

        let account_id = *state
            .account_names
            .get(&entry.account_name)
            .ok_or_else(|| StoreError::not_found("account", &entry.account_name))?;
        if state.entry_numbers.contains(&entry.entry_number) {
            return Err(StoreError::duplicate("ledger entry", entry.entry_number));
        }

        let account = state
            .accounts
            .get_mut(&account_id)
            .ok_or_else(|| StoreError::not_found("account", &entry.account_name))?;
        if !account.is_active {
            return Err(StoreError::AccountInactive(account.name.clone()));
        }
        account.balance += balance_change(account.account_type, entry.debit, entry.credit);
        let account = account.clone();

        state.entry_numbers.insert(entry.entry_number.clone());
        state.entries.push(entry.clone());
        Ok((entry, account))
    }

    async fn find_entry(&self, id: LedgerEntryId) -> StoreResult<Option<LedgerEntry>> {
        let state = self.state.read().await;
        Ok(state.entries.iter().find(|e| e.id == id).cloned())
    }

    async fn list_entries(&self, filter: &EntryFilter) -> StoreResult<Vec<LedgerEntry>> {
        let state = self.state.read().await;
        let mut entries: Vec<LedgerEntry> = state
            .entries
            .iter()
            .filter(|e| filter.matches(e))
            .cloned()
            .collect();
        entries.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.0.cmp(&a.id.0)));
        Ok(apply_limit(entries, filter.limit))
    }

    async fn insert_transaction(&self, transaction: Transaction) -> StoreResult<Transaction> {
        let mut state = self.state.write().await;
        if !state
            .transaction_numbers
            .insert(transaction.transaction_number.clone())
        {
            return Err(StoreError::duplicate(
                "transaction",
                transaction.transaction_number,
            ));
        }
        state.transactions.insert(transaction.id, transaction.clone());
        Ok(transaction)
    }

    async fn find_transaction(&self, id: TransactionId) -> StoreResult<Option<Transaction>> {
        Ok(self.state.read().await.transactions.get(&id).cloned())
    }

    async fn list_transactions(&self, filter: &TransactionFilter) -> StoreResult<Vec<Transaction>> {
        let state = self.state.read().await;
        let mut transactions: Vec<Transaction> = state
            .transactions
            .values()
            .filter(|t| filter.matches(t))
            .cloned()
            .collect();
        transactions.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.0.cmp(&a.id.0)));
        Ok(apply_limit(transactions, filter.limit))
    }

    async fn update_transaction(&self, transaction: Transaction) -> StoreResult<Transaction> {
        let mut state = self.state.write().await;
        let stored = state
            .transactions
            .get_mut(&transaction.id)
            .ok_or_else(|| StoreError::not_found("transaction", transaction.id))?;
        stored.description.clone_from(&transaction.description);
        stored.category.clone_from(&transaction.category);
        stored.status = transaction.status;
        stored.date = transaction.date;
        Ok(stored.clone())
    }

    async fn insert_invoice(&self, invoice: Invoice) -> StoreResult<Invoice> {
        let mut state = self.state.write().await;
        if !state.invoice_numbers.insert(invoice.invoice_number.clone()) {
            return Err(StoreError::duplicate("invoice", invoice.invoice_number));
        }
        state.invoices.insert(invoice.id, invoice.clone());
        Ok(invoice)
    }

    async fn find_invoice(&self, id: InvoiceId) -> StoreResult<Option<Invoice>> {
        Ok(self.state.read().await.invoices.get(&id).cloned())
    }

    async fn list_invoices(&self, filter: &InvoiceFilter) -> StoreResult<Vec<Invoice>> {
        let state = self.state.read().await;
        let mut invoices: Vec<Invoice> = state
            .invoices
            .values()
            .filter(|i| filter.matches(i))
            .cloned()
            .collect();
        invoices.sort_by(|a, b| {
            b.issue_date
                .cmp(&a.issue_date)
                .then(b.id.0.cmp(&a.id.0))
        });
        Ok(apply_limit(invoices, filter.limit))
    }

    async fn update_invoice(&self, invoice: Invoice) -> StoreResult<Invoice> {
        let mut state = self.state.write().await;
        let stored = state
            .invoices
            .get_mut(&invoice.id)
            .ok_or_else(|| StoreError::not_found("invoice", invoice.id))?;
        stored.client_name.clone_from(&invoice.client_name);
        stored.due_date = invoice.due_date;
        stored.status = invoice.status;
        stored.notes.clone_from(&invoice.notes);
        Ok(stored.clone())
    }

    async fn insert_insight_if_absent(&self, insight: AiInsight) -> StoreResult<bool> {
        let mut state = self.state.write().await;
        if !state.insight_keys.insert(insight.dedup_key.clone()) {
            return Ok(false);
        }
        state.insights.push(insight);
        Ok(true)
    }

    async fn find_insight(&self, id: InsightId) -> StoreResult<Option<AiInsight>> {
        let state = self.state.read().await;
        Ok(state.insights.iter().find(|i| i.id == id).cloned())
    }

    async fn list_insights(&self, filter: &InsightFilter) -> StoreResult<Vec<AiInsight>> {
        let state = self.state.read().await;
        let insights = state
            .insights
            .iter()
            .rev()
            .filter(|i| filter.matches(i))
            .cloned()
            .collect();
        Ok(apply_limit(insights, filter.limit))
    }

    async fn mark_insight_read(&self, id: InsightId) -> StoreResult<AiInsight> {
        let mut state = self.state.write().await;
        let insight = state
            .insights
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or_else(|| StoreError::not_found("insight", id))?;
        insight.is_read = true;
        Ok(insight.clone())
    }

    async fn append_audit(&self, log: AuditLog) -> StoreResult<()> {
        self.state.write().await.audit_logs.push(log);
        Ok(())
    }

    async fn list_audit_logs(&self, filter: &AuditFilter) -> StoreResult<Vec<AuditLog>> {
        let state = self.state.read().await;
        let logs = state
            .audit_logs
            .iter()
            .rev()
            .filter(|l| filter.matches(l))
            .cloned()
            .collect();
        Ok(apply_limit(logs, filter.limit))
    }

    async fn next_sequence(&self, prefix: &str, period: &str) -> StoreResult<u32> {
        let mut state = self.state.write().await;
        let counter = state
            .sequences
            .entry((prefix.to_string(), period.to_string()))
            .or_insert(0);
        *counter += 1;
        Ok(*counter)
    }
}

#[cfg(test)]
#[path = "memory_tests.rs"]
mod tests;
