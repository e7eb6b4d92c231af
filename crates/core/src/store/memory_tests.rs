use std::sync::Arc;

use chrono::{Duration, TimeZone, Utc};
use cogniflow_shared::types::{CurrencyCode, UserId};
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::json;

use super::*;
use crate::insights::{InsightType, Severity};
use crate::ledger::AccountType;
use crate::records::{InvoiceStatus, InvoiceType, TransactionStatus, TransactionType};

fn account(name: &str, account_type: AccountType, balance: Decimal) -> Account {
    Account {
        id: AccountId::new(),
        name: name.to_string(),
        account_type,
        balance,
        currency: CurrencyCode::default(),
        is_active: true,
        created_at: Utc::now(),
    }
}

fn entry(number: &str, account_name: &str, debit: Decimal, credit: Decimal) -> LedgerEntry {
    LedgerEntry {
        id: LedgerEntryId::new(),
        entry_number: number.to_string(),
        description: "test posting".to_string(),
        debit,
        credit,
        account_name: account_name.to_string(),
        date: Utc::now(),
        transaction_id: None,
        created_by: UserId::new(),
        created_at: Utc::now(),
    }
}

fn transaction(number: &str, days_ago: i64) -> Transaction {
    let date = Utc.with_ymd_and_hms(2026, 10, 17, 12, 0, 0).unwrap() - Duration::days(days_ago);
    Transaction {
        id: TransactionId::new(),
        transaction_number: number.to_string(),
        description: "Office supplies".to_string(),
        amount: dec!(120),
        currency: CurrencyCode::default(),
        transaction_type: TransactionType::Expense,
        category: "Supplies".to_string(),
        status: TransactionStatus::Completed,
        date,
        created_by: UserId::new(),
        created_at: date,
    }
}

fn insight(key: &str) -> AiInsight {
    AiInsight {
        id: InsightId::new(),
        insight_type: InsightType::Prediction,
        title: "Cash Flow Prediction".to_string(),
        description: "projection".to_string(),
        severity: Severity::Info,
        data: json!({}),
        is_read: false,
        dedup_key: key.to_string(),
        created_at: Utc::now(),
    }
}

#[tokio::test]
async fn test_duplicate_account_name_leaves_state_unchanged() {
    let store = MemoryStore::new();
    store
        .insert_account(account("Cash", AccountType::Asset, dec!(100)))
        .await
        .unwrap();

    let err = store
        .insert_account(account("Cash", AccountType::Liability, dec!(5)))
        .await
        .unwrap_err();
    assert!(err.is_duplicate_of("account"));

    let accounts = store.list_accounts(&AccountFilter::default()).await.unwrap();
    assert_eq!(accounts.len(), 1);
    assert_eq!(accounts[0].account_type, AccountType::Asset);
    assert_eq!(accounts[0].balance, dec!(100));
}

#[tokio::test]
async fn test_accounts_listed_by_name_with_filters() {
    let store = MemoryStore::new();
    for (name, account_type) in [
        ("Revenue", AccountType::Revenue),
        ("Cash", AccountType::Asset),
        ("Accounts Receivable", AccountType::Asset),
    ] {
        store
            .insert_account(account(name, account_type, Decimal::ZERO))
            .await
            .unwrap();
    }

    let names: Vec<String> = store
        .list_accounts(&AccountFilter::default())
        .await
        .unwrap()
        .into_iter()
        .map(|a| a.name)
        .collect();
    assert_eq!(names, ["Accounts Receivable", "Cash", "Revenue"]);

    let assets = store
        .list_accounts(&AccountFilter {
            account_type: Some(AccountType::Asset),
            is_active: None,
        })
        .await
        .unwrap();
    assert_eq!(assets.len(), 2);
}

#[tokio::test]
async fn test_post_entry_applies_sign_rule() {
    let store = MemoryStore::new();
    store
        .insert_account(account("Cash", AccountType::Asset, dec!(1000)))
        .await
        .unwrap();
    store
        .insert_account(account("Revenue", AccountType::Revenue, dec!(0)))
        .await
        .unwrap();

    let (_, cash) = store
        .post_entry(entry("JE-1", "Cash", dec!(250), dec!(0)))
        .await
        .unwrap();
    assert_eq!(cash.balance, dec!(1250));

    let (_, revenue) = store
        .post_entry(entry("JE-2", "Revenue", dec!(0), dec!(250)))
        .await
        .unwrap();
    assert_eq!(revenue.balance, dec!(250));
}

#[tokio::test]
async fn test_post_entry_unknown_account_records_nothing() {
    let store = MemoryStore::new();

    let err = store
        .post_entry(entry("JE-1", "Suspense", dec!(10), dec!(0)))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::NotFound { entity: "account", .. }));

    let entries = store.list_entries(&EntryFilter::default()).await.unwrap();
    assert!(entries.is_empty());

    // The rejected number stays free.
    store
        .insert_account(account("Suspense", AccountType::Asset, Decimal::ZERO))
        .await
        .unwrap();
    store
        .post_entry(entry("JE-1", "Suspense", dec!(10), dec!(0)))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_post_entry_rejects_inactive_account_and_duplicate_number() {
    let store = MemoryStore::new();
    let cash = store
        .insert_account(account("Cash", AccountType::Asset, dec!(50)))
        .await
        .unwrap();
    store
        .post_entry(entry("JE-1", "Cash", dec!(10), dec!(0)))
        .await
        .unwrap();

    let err = store
        .post_entry(entry("JE-1", "Cash", dec!(10), dec!(0)))
        .await
        .unwrap_err();
    assert!(err.is_duplicate_of("ledger entry"));

    store
        .update_account(
            cash.id,
            &AccountUpdate {
                is_active: Some(false),
                ..AccountUpdate::default()
            },
        )
        .await
        .unwrap();
    let err = store
        .post_entry(entry("JE-2", "Cash", dec!(10), dec!(0)))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::AccountInactive(_)));

    let stored = store.find_account(cash.id).await.unwrap().unwrap();
    assert_eq!(stored.balance, dec!(60));
    assert_eq!(store.list_entries(&EntryFilter::default()).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_rename_account_keeps_uniqueness() {
    let store = MemoryStore::new();
    let cash = store
        .insert_account(account("Cash", AccountType::Asset, Decimal::ZERO))
        .await
        .unwrap();
    store
        .insert_account(account("Bank", AccountType::Asset, Decimal::ZERO))
        .await
        .unwrap();
    store
        .post_entry(entry("JE-1", "Cash", dec!(50), Decimal::ZERO))
        .await
        .unwrap();

    let rename_to = |name: &str| AccountUpdate {
        name: Some(name.to_string()),
        ..AccountUpdate::default()
    };

    let err = store
        .update_account(cash.id, &rename_to("Bank"))
        .await
        .unwrap_err();
    assert!(err.is_duplicate_of("account"));

    let renamed = store
        .update_account(cash.id, &rename_to("Petty Cash"))
        .await
        .unwrap();
    assert_eq!(renamed.name, "Petty Cash");
    assert!(store.find_account_by_name("Cash").await.unwrap().is_none());
    assert!(store.find_account_by_name("Petty Cash").await.unwrap().is_some());

    let moved = store
        .list_entries(&EntryFilter {
            account_name: Some("Petty Cash".to_string()),
            ..EntryFilter::default()
        })
        .await
        .unwrap();
    assert_eq!(moved.len(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_postings_do_not_lose_updates() {
    let store = Arc::new(MemoryStore::new());
    store
        .insert_account(account("Cash", AccountType::Asset, Decimal::ZERO))
        .await
        .unwrap();

    let handles: Vec<_> = (0..200)
        .map(|i| {
            let store = Arc::clone(&store);
            tokio::spawn(async move {
                let (debit, credit) = if i % 4 == 0 {
                    (Decimal::ZERO, dec!(3))
                } else {
                    (dec!(10), Decimal::ZERO)
                };
                store
                    .post_entry(entry(&format!("JE-{i}"), "Cash", debit, credit))
                    .await
                    .unwrap();
            })
        })
        .collect();
    for result in futures::future::join_all(handles).await {
        result.unwrap();
    }

    // 150 debits of 10, 50 credits of 3.
    let cash = store.find_account_by_name("Cash").await.unwrap().unwrap();
    assert_eq!(cash.balance, dec!(1350));
    assert_eq!(
        store.list_entries(&EntryFilter::default()).await.unwrap().len(),
        200
    );
}

fn invoice(number: &str, due_in_days: i64) -> Invoice {
    let issued = Utc::now() - Duration::days(10);
    Invoice {
        id: InvoiceId::new(),
        invoice_number: number.to_string(),
        client_name: "XYZ Development".to_string(),
        amount: dec!(24780),
        currency: CurrencyCode::default(),
        issue_date: issued,
        due_date: issued + Duration::days(due_in_days),
        status: InvoiceStatus::Pending,
        invoice_type: InvoiceType::AccountsReceivable,
        notes: None,
        created_by: UserId::new(),
        created_at: issued,
    }
}

#[tokio::test]
async fn test_reads_without_writes_are_repeatable() {
    let store = MemoryStore::new();
    let cash = store
        .insert_account(account("Cash", AccountType::Asset, dec!(500)))
        .await
        .unwrap();
    store
        .post_entry(entry("JE-1", "Cash", dec!(120), Decimal::ZERO))
        .await
        .unwrap();
    store
        .post_entry(entry("JE-2", "Cash", Decimal::ZERO, dec!(20)))
        .await
        .unwrap();
    for (number, days_ago) in [("TXN-A", 4), ("TXN-B", 1)] {
        store.insert_transaction(transaction(number, days_ago)).await.unwrap();
    }
    store.insert_invoice(invoice("INV-1", 30)).await.unwrap();
    store.insert_invoice(invoice("INV-2", 5)).await.unwrap();

    let first = (
        store.find_account(cash.id).await.unwrap(),
        store.find_account_by_name("Cash").await.unwrap(),
        store.list_transactions(&TransactionFilter::default()).await.unwrap(),
        store.list_invoices(&InvoiceFilter::default()).await.unwrap(),
        store.list_entries(&EntryFilter::default()).await.unwrap(),
    );
    let second = (
        store.find_account(cash.id).await.unwrap(),
        store.find_account_by_name("Cash").await.unwrap(),
        store.list_transactions(&TransactionFilter::default()).await.unwrap(),
        store.list_invoices(&InvoiceFilter::default()).await.unwrap(),
        store.list_entries(&EntryFilter::default()).await.unwrap(),
    );

    assert_eq!(first, second);
    assert_eq!(first.0.map(|a| a.balance), Some(dec!(600)));
    assert_eq!(first.2.len(), 2);
    assert_eq!(first.3.len(), 2);
    assert_eq!(first.4.len(), 2);
}

#[tokio::test]
async fn test_transactions_newest_first_with_limit() {
    let store = MemoryStore::new();
    for (number, days_ago) in [("TXN-A", 5), ("TXN-B", 1), ("TXN-C", 3)] {
        store
            .insert_transaction(transaction(number, days_ago))
            .await
            .unwrap();
    }

    let listed = store
        .list_transactions(&TransactionFilter {
            limit: Some(2),
            ..TransactionFilter::default()
        })
        .await
        .unwrap();
    let numbers: Vec<&str> = listed.iter().map(|t| t.transaction_number.as_str()).collect();
    assert_eq!(numbers, ["TXN-B", "TXN-C"]);

    // Idempotent read.
    let again = store
        .list_transactions(&TransactionFilter {
            limit: Some(2),
            ..TransactionFilter::default()
        })
        .await
        .unwrap();
    assert_eq!(listed, again);
}

#[tokio::test]
async fn test_duplicate_transaction_number_rejected() {
    let store = MemoryStore::new();
    let first = store.insert_transaction(transaction("TXN-1", 0)).await.unwrap();

    let err = store
        .insert_transaction(transaction("TXN-1", 2))
        .await
        .unwrap_err();
    assert!(err.is_duplicate_of("transaction"));

    let all = store
        .list_transactions(&TransactionFilter::default())
        .await
        .unwrap();
    assert_eq!(all, vec![first]);
}

#[tokio::test]
async fn test_insight_dedup_and_mark_read() {
    let store = MemoryStore::new();
    let stored = insight("key-1");

    assert!(store.insert_insight_if_absent(stored.clone()).await.unwrap());
    assert!(!store.insert_insight_if_absent(insight("key-1")).await.unwrap());
    assert!(store.insert_insight_if_absent(insight("key-2")).await.unwrap());

    let read = store.mark_insight_read(stored.id).await.unwrap();
    assert!(read.is_read);

    let unread = store
        .list_insights(&InsightFilter {
            is_read: Some(false),
            ..InsightFilter::default()
        })
        .await
        .unwrap();
    assert_eq!(unread.len(), 1);
    assert_eq!(unread[0].dedup_key, "key-2");

    let err = store.mark_insight_read(InsightId::new()).await.unwrap_err();
    assert!(matches!(err, StoreError::NotFound { entity: "insight", .. }));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Stored balance = opening balance + sum of signed deltas, whatever the order.
    #[test]
    fn prop_store_balance_matches_signed_sum(
        opening in (-1_000_000i64..1_000_000i64).prop_map(|n| Decimal::new(n, 2)),
        postings in prop::collection::vec(
            (0i64..500_000i64, any::<bool>()).prop_map(|(n, is_debit)| {
                let amount = Decimal::new(n + 1, 2);
                if is_debit { (amount, Decimal::ZERO) } else { (Decimal::ZERO, amount) }
            }),
            1..30,
        ),
    ) {
        let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
        let (forward, backward) = runtime.block_on(async {
            let mut balances = Vec::new();
            for ordering in [postings.clone(), postings.iter().rev().copied().collect()] {
                let store = MemoryStore::new();
                store
                    .insert_account(account("Accounts Payable", AccountType::Liability, opening))
                    .await
                    .unwrap();
                for (i, (debit, credit)) in ordering.into_iter().enumerate() {
                    store
                        .post_entry(entry(&format!("JE-{i}"), "Accounts Payable", debit, credit))
                        .await
                        .unwrap();
                }
                let stored = store.find_account_by_name("Accounts Payable").await.unwrap().unwrap();
                balances.push(stored.balance);
            }
            (balances[0], balances[1])
        });

        let expected: Decimal = opening + postings.iter().map(|(d, c)| c - d).sum::<Decimal>();
        prop_assert_eq!(forward, expected);
        prop_assert_eq!(backward, expected);
    }
}
