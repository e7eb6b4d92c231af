//! Demo books for local development.
//!
//! Seeds a small chart of accounts, five transactions and three settled
//! invoices. Seeding is skipped when a `Cash` account already exists.

use chrono::{DateTime, Duration, Utc};
use cogniflow_shared::types::{CurrencyCode, UserId};
use rust_decimal::Decimal;
use thiserror::Error;

use crate::ledger::{AccountType, LedgerError, LedgerService, NewAccount};
use crate::records::{
    InvoiceStatus, InvoiceType, InvoiceUpdate, NewInvoice, NewTransaction, RecordError,
    RecordService, TransactionStatus, TransactionType,
};

/// Fixed actor recorded as the author of demo data.
pub const DEMO_USER_ID: &str = "00000000-0000-7000-8000-000000000002";

/// Seeding failures.
#[derive(Debug, Error)]
pub enum SeedError {
    /// Account creation failed.
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    /// Transaction or invoice creation failed.
    #[error(transparent)]
    Record(#[from] RecordError),
}

/// What a seeding run did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    /// Demo data was written.
    Seeded {
        /// Accounts created.
        accounts: usize,
        /// Transactions recorded.
        transactions: usize,
        /// Invoices recorded.
        invoices: usize,
    },
    /// Books already hold data.
    AlreadySeeded,
}

/// The demo actor id.
#[must_use]
pub fn demo_user() -> UserId {
    DEMO_USER_ID.parse().unwrap_or_default()
}

const ACCOUNTS: [(&str, AccountType, i64); 4] = [
    ("Cash", AccountType::Asset, 247_928),
    ("Accounts Receivable", AccountType::Asset, 78_430),
    ("Revenue", AccountType::Revenue, 1_437_890),
    ("Expenses", AccountType::Expense, 532_670),
];

/// `(number, description, amount, type, category, status, days ago)`
const TRANSACTIONS: [(&str, &str, i64, TransactionType, &str, TransactionStatus, i64); 5] = [
    ("INV-2023-078", "Invoice Payment", 12_450, TransactionType::Income, "Accounts Receivable", TransactionStatus::Completed, 2),
    ("PO-2023-142", "Supplier Payment", 8_750, TransactionType::Expense, "Accounts Payable", TransactionStatus::Completed, 5),
    ("PR-2023-06", "Payroll", 42_380, TransactionType::Expense, "Salaries & Wages", TransactionStatus::Completed, 8),
    ("TX-2023-Q2", "Tax Payment", 18_940, TransactionType::Expense, "Taxes & Duties", TransactionStatus::Pending, 10),
    ("INV-2023-077", "Invoice Payment", 24_780, TransactionType::Income, "Accounts Receivable", TransactionStatus::Completed, 12),
];

/// `(number, client, amount, type, issued days ago, due in days, notes)`
const INVOICES: [(&str, &str, i64, InvoiceType, i64, i64, &str); 3] = [
    ("INV-2023-078", "ABC Construction", 12_450, InvoiceType::AccountsReceivable, 15, 15, "Project phase 1 completion"),
    ("INV-2023-077", "XYZ Development", 24_780, InvoiceType::AccountsReceivable, 18, 12, "Consulting services"),
    ("PO-2023-142", "Building Supplies Inc.", 8_750, InvoiceType::AccountsPayable, 20, -5, "Monthly material supplies"),
];

/// Seeds the demo books relative to `now`.
///
/// # Errors
///
/// Any service error other than the data already being present.
pub async fn seed_demo_data(
    ledger: &LedgerService,
    records: &RecordService,
    now: DateTime<Utc>,
) -> Result<SeedOutcome, SeedError> {
    match ledger.get_account("Cash").await {
        Ok(_) => return Ok(SeedOutcome::AlreadySeeded),
        Err(LedgerError::AccountNotFound(_)) => {}
        Err(e) => return Err(e.into()),
    }

    let actor = demo_user();

    for (name, account_type, balance) in ACCOUNTS {
        ledger
            .create_account(
                actor,
                NewAccount {
                    name: name.to_string(),
                    account_type,
                    opening_balance: Decimal::from(balance),
                    currency: CurrencyCode::default(),
                },
            )
            .await?;
    }

    // Oldest first so anomaly checks see the history build up.
    for (number, description, amount, transaction_type, category, status, days_ago) in
        TRANSACTIONS.into_iter().rev()
    {
        records
            .create_transaction(
                actor,
                NewTransaction {
                    transaction_number: Some(number.to_string()),
                    description: description.to_string(),
                    amount: Decimal::from(amount),
                    currency: CurrencyCode::default(),
                    transaction_type,
                    category: category.to_string(),
                    status: Some(status),
                    date: Some(now - Duration::days(days_ago)),
                },
            )
            .await?;
    }

    for (number, client, amount, invoice_type, issued_ago, due_in, notes) in INVOICES {
        let invoice = records
            .create_invoice(
                actor,
                NewInvoice {
                    invoice_number: Some(number.to_string()),
                    client_name: client.to_string(),
                    amount: Decimal::from(amount),
                    currency: CurrencyCode::default(),
                    issue_date: Some(now - Duration::days(issued_ago)),
                    due_date: now + Duration::days(due_in),
                    invoice_type,
                    notes: Some(notes.to_string()),
                },
            )
            .await?;
        records
            .update_invoice(
                actor,
                invoice.id,
                InvoiceUpdate {
                    status: Some(InvoiceStatus::Paid),
                    ..InvoiceUpdate::default()
                },
            )
            .await?;
    }

    tracing::info!(
        accounts = ACCOUNTS.len(),
        transactions = TRANSACTIONS.len(),
        invoices = INVOICES.len(),
        "Demo data seeded"
    );

    Ok(SeedOutcome::Seeded {
        accounts: ACCOUNTS.len(),
        transactions: TRANSACTIONS.len(),
        invoices: INVOICES.len(),
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use rust_decimal_macros::dec;

    use super::*;
    use crate::insights::{InsightEngine, InsightPolicy, InsightService};
    use crate::ledger::AccountFilter;
    use crate::records::{InvoiceFilter, TransactionFilter};
    use crate::reports::ReportService;
    use crate::store::MemoryStore;

    fn services() -> (LedgerService, RecordService) {
        let store = Arc::new(MemoryStore::new());
        let insights = InsightService::new(store.clone(), InsightEngine::standard(InsightPolicy::default()));
        (
            LedgerService::new(store.clone()),
            RecordService::new(store, insights),
        )
    }

    #[tokio::test]
    async fn test_seed_is_idempotent() {
        let (ledger, records) = services();
        let now = Utc::now();

        let first = seed_demo_data(&ledger, &records, now).await.unwrap();
        assert_eq!(
            first,
            SeedOutcome::Seeded {
                accounts: 4,
                transactions: 5,
                invoices: 3
            }
        );
        assert_eq!(
            seed_demo_data(&ledger, &records, now).await.unwrap(),
            SeedOutcome::AlreadySeeded
        );

        let accounts = ledger.list_accounts(&AccountFilter::default()).await.unwrap();
        assert_eq!(accounts.len(), 4);
        let transactions = records
            .list_transactions(&TransactionFilter::default())
            .await
            .unwrap();
        assert_eq!(transactions.len(), 5);
        assert_eq!(transactions[0].transaction_number, "INV-2023-078");

        let invoices = records.list_invoices(&InvoiceFilter::default()).await.unwrap();
        assert!(invoices.iter().all(|i| i.status == InvoiceStatus::Paid));
    }

    #[tokio::test]
    async fn test_demo_books_report_figures() {
        let (ledger, records) = services();
        seed_demo_data(&ledger, &records, Utc::now()).await.unwrap();
        let accounts = ledger.list_accounts(&AccountFilter::default()).await.unwrap();

        let statement = ReportService::income_statement(&accounts, &[]);
        assert_eq!(statement.net_income, dec!(905220));

        let sheet = ReportService::balance_sheet(&accounts);
        assert_eq!(sheet.total_assets, dec!(326358));
        assert!(!sheet.is_balanced);
    }

    #[test]
    fn test_demo_user_parses() {
        assert_eq!(demo_user().to_string(), DEMO_USER_ID);
    }
}
