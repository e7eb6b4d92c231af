//! PostgreSQL-backed [`ErpStore`].
//!
//! Posting locks the account row, inserts the entry and applies
//! `balance = balance + delta` inside one database transaction.

use async_trait::async_trait;
use cogniflow_core::audit::{AuditFilter, AuditLog};
use cogniflow_core::insights::{AiInsight, InsightFilter};
use cogniflow_core::ledger::{
    Account, AccountFilter, AccountType, AccountUpdate, EntryFilter, LedgerEntry, balance_change,
};
use cogniflow_core::records::{Invoice, InvoiceFilter, Transaction, TransactionFilter};
use cogniflow_core::store::{ErpStore, StoreError, StoreResult};
use cogniflow_shared::types::{AccountId, InsightId, InvoiceId, LedgerEntryId, TransactionId};
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbBackend, EntityTrait,
    IntoActiveModel, QueryFilter, QueryOrder, QuerySelect, Set, Statement, TransactionTrait,
};

use crate::convert::{
    account_row, audit_row, backend, entry_row, insight_row, invoice_row, is_not_inserted,
    on_insert, transaction_row,
};
use crate::entities::{accounts, ai_insights, audit_logs, invoices, ledger_entries, transactions};

const NEXT_SEQUENCE_SQL: &str = r"
INSERT INTO number_sequences (prefix, period, last_value)
VALUES ($1, $2, 1)
ON CONFLICT (prefix, period)
DO UPDATE SET last_value = number_sequences.last_value + 1
RETURNING last_value
";

/// Store over a `SeaORM` connection pool.
#[derive(Debug, Clone)]
pub struct PgStore {
    db: DatabaseConnection,
}

impl PgStore {
    /// Wraps an open connection.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// The underlying connection.
    #[must_use]
    pub const fn connection(&self) -> &DatabaseConnection {
        &self.db
    }
}

fn convert_all<M, T>(rows: Vec<M>) -> StoreResult<Vec<T>>
where
    T: TryFrom<M, Error = StoreError>,
{
    rows.into_iter().map(T::try_from).collect()
}

fn limited<Q: QuerySelect>(query: Q, limit: Option<u64>) -> Q {
    match limit {
        Some(limit) => query.limit(limit),
        None => query,
    }
}

#[async_trait]
impl ErpStore for PgStore {
    // ========== Accounts ==========

    async fn insert_account(&self, account: Account) -> StoreResult<Account> {
        account_row(&account)
            .insert(&self.db)
            .await
            .map_err(on_insert("account", &account.name))?
            .try_into()
    }

    async fn find_account(&self, id: AccountId) -> StoreResult<Option<Account>> {
        accounts::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await
            .map_err(backend)?
            .map(Account::try_from)
            .transpose()
    }

    async fn find_account_by_name(&self, name: &str) -> StoreResult<Option<Account>> {
        accounts::Entity::find()
            .filter(accounts::Column::Name.eq(name))
            .one(&self.db)
            .await
            .map_err(backend)?
            .map(Account::try_from)
            .transpose()
    }

    async fn list_accounts(&self, filter: &AccountFilter) -> StoreResult<Vec<Account>> {
        let mut query = accounts::Entity::find();
        if let Some(account_type) = filter.account_type {
            query = query.filter(accounts::Column::AccountType.eq(account_type.as_str()));
        }
        if let Some(is_active) = filter.is_active {
            query = query.filter(accounts::Column::IsActive.eq(is_active));
        }

        let rows = query
            .order_by_asc(accounts::Column::Name)
            .all(&self.db)
            .await
            .map_err(backend)?;
        convert_all(rows)
    }

    async fn update_account(&self, id: AccountId, update: &AccountUpdate) -> StoreResult<Account> {
        let current = accounts::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await
            .map_err(backend)?
            .ok_or_else(|| StoreError::not_found("account", id))?;

        let mut row = current.into_active_model();
        if let Some(name) = &update.name {
            row.name = Set(name.clone());
        }
        if let Some(currency) = &update.currency {
            row.currency = Set(currency.to_string());
        }
        if let Some(is_active) = update.is_active {
            row.is_active = Set(is_active);
        }

        // Ledger entries follow a rename through `ON UPDATE CASCADE`.
        let new_name = update.name.as_deref().unwrap_or_default();
        row.update(&self.db)
            .await
            .map_err(on_insert("account", new_name))?
            .try_into()
    }

    // ========== Ledger entries ==========

    async fn post_entry(&self, entry: LedgerEntry) -> StoreResult<(LedgerEntry, Account)> {
        let txn = self.db.begin().await.map_err(backend)?;

        let account = accounts::Entity::find()
            .filter(accounts::Column::Name.eq(entry.account_name.as_str()))
            .lock_exclusive()
            .one(&txn)
            .await
            .map_err(backend)?
            .ok_or_else(|| StoreError::not_found("account", &entry.account_name))?;
        if !account.is_active {
            return Err(StoreError::AccountInactive(account.name));
        }
        let account_type: AccountType = account
            .account_type
            .parse()
            .map_err(|e: String| StoreError::backend(e))?;

        let stored = entry_row(&entry)
            .insert(&txn)
            .await
            .map_err(on_insert("ledger entry", &entry.entry_number))?;

        let delta = balance_change(account_type, entry.debit, entry.credit);
        accounts::Entity::update_many()
            .col_expr(
                accounts::Column::Balance,
                Expr::col(accounts::Column::Balance).add(delta),
            )
            .filter(accounts::Column::Id.eq(account.id))
            .exec(&txn)
            .await
            .map_err(backend)?;

        let updated = accounts::Entity::find_by_id(account.id)
            .one(&txn)
            .await
            .map_err(backend)?
            .ok_or_else(|| StoreError::not_found("account", &entry.account_name))?;

        txn.commit().await.map_err(backend)?;

        tracing::debug!(
            entry_number = %stored.entry_number,
            account = %updated.name,
            %delta,
            "Ledger entry committed"
        );
        Ok((stored.into(), updated.try_into()?))
    }

    async fn find_entry(&self, id: LedgerEntryId) -> StoreResult<Option<LedgerEntry>> {
        Ok(ledger_entries::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await
            .map_err(backend)?
            .map(LedgerEntry::from))
    }

    async fn list_entries(&self, filter: &EntryFilter) -> StoreResult<Vec<LedgerEntry>> {
        let mut query = ledger_entries::Entity::find();
        if let Some(account_name) = &filter.account_name {
            query = query.filter(ledger_entries::Column::AccountName.eq(account_name.as_str()));
        }
        if let Some(transaction_id) = filter.transaction_id {
            query = query.filter(ledger_entries::Column::TransactionId.eq(transaction_id.into_inner()));
        }

        let query = query
            .order_by_desc(ledger_entries::Column::EntryDate)
            .order_by_desc(ledger_entries::Column::Id);
        let rows = limited(query, filter.limit)
            .all(&self.db)
            .await
            .map_err(backend)?;
        Ok(rows.into_iter().map(LedgerEntry::from).collect())
    }

    // ========== Transactions ==========

    async fn insert_transaction(&self, transaction: Transaction) -> StoreResult<Transaction> {
        transaction_row(&transaction)
            .insert(&self.db)
            .await
            .map_err(on_insert("transaction", &transaction.transaction_number))?
            .try_into()
    }

    async fn find_transaction(&self, id: TransactionId) -> StoreResult<Option<Transaction>> {
        transactions::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await
            .map_err(backend)?
            .map(Transaction::try_from)
            .transpose()
    }

    async fn list_transactions(&self, filter: &TransactionFilter) -> StoreResult<Vec<Transaction>> {
        let mut query = transactions::Entity::find();
        if let Some(transaction_type) = filter.transaction_type {
            query = query.filter(transactions::Column::TransactionType.eq(transaction_type.as_str()));
        }
        if let Some(status) = filter.status {
            query = query.filter(transactions::Column::Status.eq(status.as_str()));
        }
        if let Some(category) = &filter.category {
            query = query.filter(transactions::Column::Category.eq(category.as_str()));
        }
        if let Some(from) = filter.from {
            query = query.filter(transactions::Column::TransactionDate.gte(from));
        }
        if let Some(to) = filter.to {
            query = query.filter(transactions::Column::TransactionDate.lte(to));
        }

        let query = query
            .order_by_desc(transactions::Column::TransactionDate)
            .order_by_desc(transactions::Column::Id);
        let rows = limited(query, filter.limit)
            .all(&self.db)
            .await
            .map_err(backend)?;
        convert_all(rows)
    }

    async fn update_transaction(&self, transaction: Transaction) -> StoreResult<Transaction> {
        let current = transactions::Entity::find_by_id(transaction.id.into_inner())
            .one(&self.db)
            .await
            .map_err(backend)?
            .ok_or_else(|| StoreError::not_found("transaction", transaction.id))?;

        let mut row = current.into_active_model();
        row.description = Set(transaction.description);
        row.category = Set(transaction.category);
        row.status = Set(transaction.status.as_str().to_string());
        row.transaction_date = Set(transaction.date.into());

        row.update(&self.db).await.map_err(backend)?.try_into()
    }

    // ========== Invoices ==========

    async fn insert_invoice(&self, invoice: Invoice) -> StoreResult<Invoice> {
        invoice_row(&invoice)
            .insert(&self.db)
            .await
            .map_err(on_insert("invoice", &invoice.invoice_number))?
            .try_into()
    }

    async fn find_invoice(&self, id: InvoiceId) -> StoreResult<Option<Invoice>> {
        invoices::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await
            .map_err(backend)?
            .map(Invoice::try_from)
            .transpose()
    }

    async fn list_invoices(&self, filter: &InvoiceFilter) -> StoreResult<Vec<Invoice>> {
        let mut query = invoices::Entity::find();
        if let Some(invoice_type) = filter.invoice_type {
            query = query.filter(invoices::Column::InvoiceType.eq(invoice_type.as_str()));
        }
        if let Some(status) = filter.status {
            query = query.filter(invoices::Column::Status.eq(status.as_str()));
        }

        let query = query
            .order_by_desc(invoices::Column::IssueDate)
            .order_by_desc(invoices::Column::Id);
        let rows = limited(query, filter.limit)
            .all(&self.db)
            .await
            .map_err(backend)?;
        convert_all(rows)
    }

    async fn update_invoice(&self, invoice: Invoice) -> StoreResult<Invoice> {
        let current = invoices::Entity::find_by_id(invoice.id.into_inner())
            .one(&self.db)
            .await
            .map_err(backend)?
            .ok_or_else(|| StoreError::not_found("invoice", invoice.id))?;

        let mut row = current.into_active_model();
        row.client_name = Set(invoice.client_name);
        row.due_date = Set(invoice.due_date.into());
        row.status = Set(invoice.status.as_str().to_string());
        row.notes = Set(invoice.notes);

        row.update(&self.db).await.map_err(backend)?.try_into()
    }

    // ========== Insights ==========

    async fn insert_insight_if_absent(&self, insight: AiInsight) -> StoreResult<bool> {
        let result = ai_insights::Entity::insert(insight_row(&insight))
            .on_conflict(
                OnConflict::column(ai_insights::Column::DedupKey)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await;

        match result {
            Ok(rows) => Ok(rows > 0),
            Err(e) if is_not_inserted(&e) => Ok(false),
            Err(e) => Err(backend(e)),
        }
    }

    async fn find_insight(&self, id: InsightId) -> StoreResult<Option<AiInsight>> {
        ai_insights::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await
            .map_err(backend)?
            .map(AiInsight::try_from)
            .transpose()
    }

    async fn list_insights(&self, filter: &InsightFilter) -> StoreResult<Vec<AiInsight>> {
        let mut query = ai_insights::Entity::find();
        if let Some(insight_type) = filter.insight_type {
            query = query.filter(ai_insights::Column::InsightType.eq(insight_type.as_str()));
        }
        if let Some(is_read) = filter.is_read {
            query = query.filter(ai_insights::Column::IsRead.eq(is_read));
        }

        let query = query
            .order_by_desc(ai_insights::Column::CreatedAt)
            .order_by_desc(ai_insights::Column::Id);
        let rows = limited(query, filter.limit)
            .all(&self.db)
            .await
            .map_err(backend)?;
        convert_all(rows)
    }

    async fn mark_insight_read(&self, id: InsightId) -> StoreResult<AiInsight> {
        let result = ai_insights::Entity::update_many()
            .col_expr(ai_insights::Column::IsRead, Expr::value(true))
            .filter(ai_insights::Column::Id.eq(id.into_inner()))
            .exec(&self.db)
            .await
            .map_err(backend)?;
        if result.rows_affected == 0 {
            return Err(StoreError::not_found("insight", id));
        }

        self.find_insight(id)
            .await?
            .ok_or_else(|| StoreError::not_found("insight", id))
    }

    // ========== Audit trail ==========

    async fn append_audit(&self, log: AuditLog) -> StoreResult<()> {
        audit_logs::Entity::insert(audit_row(&log))
            .exec_without_returning(&self.db)
            .await
            .map_err(backend)?;
        Ok(())
    }

    async fn list_audit_logs(&self, filter: &AuditFilter) -> StoreResult<Vec<AuditLog>> {
        let mut query = audit_logs::Entity::find();
        if let Some(entity_type) = &filter.entity_type {
            query = query.filter(audit_logs::Column::EntityType.eq(entity_type.as_str()));
        }
        if let Some(entity_id) = &filter.entity_id {
            query = query.filter(audit_logs::Column::EntityId.eq(entity_id.as_str()));
        }

        let query = query
            .order_by_desc(audit_logs::Column::CreatedAt)
            .order_by_desc(audit_logs::Column::Id);
        let rows = limited(query, filter.limit)
            .all(&self.db)
            .await
            .map_err(backend)?;
        convert_all(rows)
    }

    // ========== Numbering ==========

    async fn next_sequence(&self, prefix: &str, period: &str) -> StoreResult<u32> {
        let statement = Statement::from_sql_and_values(
            DbBackend::Postgres,
            NEXT_SEQUENCE_SQL,
            [prefix.into(), period.into()],
        );
        let row = self
            .db
            .query_one(statement)
            .await
            .map_err(backend)?
            .ok_or_else(|| StoreError::backend("sequence upsert returned no row"))?;

        let value: i32 = row.try_get("", "last_value").map_err(backend)?;
        u32::try_from(value)
            .map_err(|_| StoreError::backend(format!("sequence out of range: {value}")))
    }
}
