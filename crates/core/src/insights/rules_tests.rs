use chrono::{Duration, TimeZone};
use cogniflow_shared::types::{AccountId, CurrencyCode, TransactionId, UserId};
use rstest::rstest;
use rust_decimal_macros::dec;

use super::*;
use crate::ledger::AccountType;
use crate::records::TransactionStatus;

fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
}

fn tx(
    number: &str,
    kind: TransactionType,
    amount: Decimal,
    category: &str,
    date: DateTime<Utc>,
) -> Transaction {
    Transaction {
        id: TransactionId::new(),
        transaction_number: number.to_string(),
        description: format!("{category} payment"),
        amount,
        currency: CurrencyCode::default(),
        transaction_type: kind,
        category: category.to_string(),
        status: TransactionStatus::Completed,
        date,
        created_by: UserId::new(),
        created_at: date,
    }
}

fn expense(number: &str, amount: Decimal, category: &str, date: DateTime<Utc>) -> Transaction {
    tx(number, TransactionType::Expense, amount, category, date)
}

fn decimal_at(data: &serde_json::Value, key: &str) -> Decimal {
    data[key].as_str().unwrap().parse().unwrap()
}

fn account(name: &str, account_type: AccountType, balance: Decimal) -> Account {
    Account {
        id: AccountId::new(),
        name: name.to_string(),
        account_type,
        balance,
        currency: CurrencyCode::default(),
        is_active: true,
        created_at: at(2026, 1, 1, 0),
    }
}

#[test]
fn test_large_amount_produces_single_anomaly() {
    let policy = InsightPolicy::default();
    let mut history = vec![
        expense("TXN-1", dec!(900), "Supplies", at(2026, 3, 1, 9)),
        expense("TXN-2", dec!(1000), "Supplies", at(2026, 3, 5, 9)),
        expense("TXN-3", dec!(1100), "Supplies", at(2026, 3, 10, 9)),
    ];
    let candidate = expense("TXN-4", dec!(5000), "Supplies", at(2026, 3, 20, 9));
    history.push(candidate.clone());

    let draft = AnomalyDetector::default()
        .detect(&candidate, &history, &policy)
        .unwrap();

    assert_eq!(draft.insight_type, InsightType::Anomaly);
    assert_eq!(draft.severity, Severity::Warning);
    assert_eq!(draft.subject, "TXN-4");
    assert_eq!(
        draft.description,
        "Transaction TXN-4 may require review. Transaction amount is significantly higher than average."
    );
    assert_eq!(draft.data["reasons"].as_array().unwrap().len(), 1);
}

#[rstest]
#[case(Duration::hours(3), true)]
#[case(Duration::hours(23), true)]
#[case(Duration::hours(24), false)]
#[case(Duration::days(10), false)]
fn test_duplicate_window(#[case] gap: Duration, #[case] flagged: bool) {
    let policy = InsightPolicy::default();
    let first = expense("TXN-10", dec!(500), "Travel", at(2026, 4, 2, 8));
    let second = expense("TXN-11", dec!(500), "Travel", first.date + gap);
    let history = vec![first, second.clone()];

    let draft = AnomalyDetector::default().detect(&second, &history, &policy);

    assert_eq!(draft.is_some(), flagged);
    if let Some(draft) = draft {
        assert!(draft.description.contains("Potential duplicate transaction detected"));
    }
}

#[test]
fn test_multiple_reasons_are_combined() {
    let policy = InsightPolicy::default();
    let history = vec![
        expense("TXN-1", dec!(100), "Office", at(2026, 4, 10, 9)),
        expense("TXN-2", dec!(100), "Office", at(2026, 4, 20, 9)),
        expense("TXN-3", dec!(100), "Office", at(2026, 5, 1, 9)),
        expense("TXN-4", dec!(2000), "Consulting", at(2026, 5, 2, 10)),
    ];
    let candidate = expense("TXN-5", dec!(2000), "Consulting", at(2026, 5, 2, 12));

    let draft = AnomalyDetector::default()
        .detect(&candidate, &history, &policy)
        .unwrap();

    let reasons = draft.data["reasons"].as_array().unwrap();
    assert_eq!(reasons.len(), 2);
    assert!(draft.description.contains("significantly higher than average"));
    assert!(draft.description.contains("Potential duplicate"));
}

#[test]
fn test_novel_category_needs_history() {
    let policy = InsightPolicy::default();
    let candidate = expense("TXN-1", dec!(250), "Marketing", at(2026, 5, 1, 9));
    assert!(
        AnomalyDetector::default()
            .detect(&candidate, std::slice::from_ref(&candidate), &policy)
            .is_none()
    );

    let history = vec![expense("TXN-0", dec!(300), "Rent", at(2026, 4, 1, 9))];
    let draft = AnomalyDetector::default()
        .detect(&candidate, &history, &policy)
        .unwrap();
    assert!(draft.description.contains("category is new"));
}

#[test]
fn test_cancelled_history_is_ignored() {
    let policy = InsightPolicy::default();
    let mut voided = expense("TXN-1", dec!(500), "Travel", at(2026, 4, 2, 8));
    voided.status = TransactionStatus::Cancelled;
    let base = expense("TXN-0", dec!(400), "Travel", at(2026, 3, 2, 8));
    let candidate = expense("TXN-2", dec!(500), "Travel", at(2026, 4, 2, 9));

    let draft = AnomalyDetector::default().detect(&candidate, &[base, voided], &policy);
    assert!(draft.is_none());
}

#[test]
fn test_cash_flow_prediction_figures() {
    let policy = InsightPolicy::default();
    let now = at(2026, 10, 17, 12);
    let transactions = vec![
        tx("TXN-1", TransactionType::Income, dec!(60000), "Sales", at(2026, 5, 3, 9)),
        tx("TXN-2", TransactionType::Expense, dec!(12000), "Rent", at(2026, 8, 3, 9)),
        // Before the window.
        tx("TXN-3", TransactionType::Income, dec!(99999), "Sales", at(2026, 3, 31, 9)),
    ];
    let ctx = AnalysisContext {
        now,
        transactions: &transactions,
        accounts: &[],
        policy: &policy,
    };

    let drafts = CashFlowPredictionRule.evaluate(&ctx);

    assert_eq!(drafts.len(), 1);
    let draft = &drafts[0];
    assert_eq!(draft.severity, Severity::Info);
    assert_eq!(decimal_at(&draft.data, "predictedCashFlow"), dec!(24000));
    assert_eq!(
        draft.description,
        "Based on current trends, projected cash flow for next quarter is estimated at $24K, 8.7% YoY."
    );
}

#[test]
fn test_cash_flow_prediction_negative_is_warning() {
    let policy = InsightPolicy::default();
    let transactions = vec![expense("TXN-1", dec!(6000), "Rent", at(2026, 9, 1, 9))];
    let ctx = AnalysisContext {
        now: at(2026, 10, 17, 12),
        transactions: &transactions,
        accounts: &[],
        policy: &policy,
    };

    let drafts = CashFlowPredictionRule.evaluate(&ctx);
    assert_eq!(drafts[0].severity, Severity::Warning);
    assert!(drafts[0].description.contains("-8.7% YoY"));
}

#[test]
fn test_cash_flow_prediction_needs_activity() {
    let policy = InsightPolicy::default();
    let ctx = AnalysisContext {
        now: at(2026, 10, 17, 12),
        transactions: &[],
        accounts: &[],
        policy: &policy,
    };
    assert!(CashFlowPredictionRule.evaluate(&ctx).is_empty());
}

#[test]
fn test_cost_saving_picks_largest_category_alphabetically_on_tie() {
    let policy = InsightPolicy::default();
    let transactions = vec![
        expense("TXN-1", dec!(500), "Utilities", at(2026, 9, 1, 9)),
        expense("TXN-2", dec!(500), "Equipment", at(2026, 9, 2, 9)),
        expense("TXN-3", dec!(200), "Office", at(2026, 9, 3, 9)),
    ];
    let ctx = AnalysisContext {
        now: at(2026, 10, 17, 12),
        transactions: &transactions,
        accounts: &[],
        policy: &policy,
    };

    let drafts = CostSavingRule.evaluate(&ctx);

    assert_eq!(drafts.len(), 1);
    assert_eq!(drafts[0].subject, "Equipment");
    assert_eq!(
        drafts[0].description,
        "AI analysis suggests potential 12% savings in equipment costs by adjusting procurement strategies."
    );
    assert_eq!(decimal_at(&drafts[0].data, "potentialSavings"), dec!(60));
}

#[test]
fn test_tax_deduction_uses_current_quarter_only() {
    let policy = InsightPolicy::default();
    let transactions = vec![
        expense("TXN-1", dec!(40000), "Payroll", at(2026, 10, 2, 9)),
        expense("TXN-2", dec!(90000), "Payroll", at(2026, 9, 30, 9)),
    ];
    let ctx = AnalysisContext {
        now: at(2026, 10, 17, 12),
        transactions: &transactions,
        accounts: &[],
        policy: &policy,
    };

    let drafts = TaxDeductionRule.evaluate(&ctx);

    assert_eq!(drafts.len(), 1);
    assert_eq!(drafts[0].subject, "2026-Q4");
    assert_eq!(drafts[0].data["quarter"], "Q4");
    assert_eq!(
        drafts[0].description,
        "Identified potential tax deductions worth $3K for Q4 based on current financial activity."
    );
}

#[test]
fn test_tax_deduction_skips_empty_quarter() {
    let policy = InsightPolicy::default();
    let ctx = AnalysisContext {
        now: at(2026, 10, 17, 12),
        transactions: &[],
        accounts: &[],
        policy: &policy,
    };
    assert!(TaxDeductionRule.evaluate(&ctx).is_empty());
}

#[test]
fn test_book_balance_rule() {
    let policy = InsightPolicy::default();
    let balanced = vec![
        account("Cash", AccountType::Asset, dec!(100)),
        account("Equity", AccountType::Equity, dec!(100)),
    ];
    let ctx = AnalysisContext {
        now: at(2026, 10, 17, 12),
        transactions: &[],
        accounts: &balanced,
        policy: &policy,
    };
    assert!(BookBalanceRule.evaluate(&ctx).is_empty());

    let unbalanced = vec![account("Cash", AccountType::Asset, dec!(100))];
    let ctx = AnalysisContext {
        accounts: &unbalanced,
        ..ctx
    };
    let drafts = BookBalanceRule.evaluate(&ctx);
    assert_eq!(drafts.len(), 1);
    assert_eq!(drafts[0].severity, Severity::Warning);
    assert_eq!(decimal_at(&drafts[0].data, "discrepancy"), dec!(100));
}
