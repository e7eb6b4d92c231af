//! Report data types.

use chrono::NaiveDate;
use cogniflow_shared::types::{AccountId, CurrencyCode};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::ledger::{Account, AccountType};

/// One account as it appears on a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountLine {
    /// Account ID.
    pub account_id: AccountId,
    /// Account name.
    pub name: String,
    /// Account type.
    pub account_type: AccountType,
    /// Current balance.
    pub balance: Decimal,
    /// Currency code.
    pub currency: CurrencyCode,
}

impl From<&Account> for AccountLine {
    fn from(account: &Account) -> Self {
        Self {
            account_id: account.id,
            name: account.name.clone(),
            account_type: account.account_type,
            balance: account.balance,
            currency: account.currency.clone(),
        }
    }
}

/// Cash-flow report over an inclusive date range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CashFlowReport {
    /// First day included.
    pub start_date: NaiveDate,
    /// Last day included.
    pub end_date: NaiveDate,
    /// Sum of income.
    pub inflow: Decimal,
    /// Sum of expenses.
    pub outflow: Decimal,
    /// `inflow - outflow`.
    pub net: Decimal,
    /// One bucket per calendar month touched by the range, oldest first.
    pub series: Vec<CashFlowBucket>,
}

/// Monthly cash-flow bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CashFlowBucket {
    /// Month as `YYYY-MM`.
    pub month: String,
    /// Income in the month.
    pub inflow: Decimal,
    /// Expenses in the month.
    pub outflow: Decimal,
    /// `inflow - outflow`.
    pub net: Decimal,
}

/// Amount attributed to a transaction category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryAmount {
    /// Category name.
    pub category: String,
    /// Total amount.
    pub amount: Decimal,
    /// Share of the section total, two decimals.
    pub percent: Decimal,
}

/// Income statement from current account balances.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomeStatement {
    /// Sum of revenue account balances.
    pub revenue: Decimal,
    /// Sum of expense account balances.
    pub expenses: Decimal,
    /// `revenue - expenses`.
    pub net_income: Decimal,
    /// Revenue accounts.
    pub revenue_accounts: Vec<AccountLine>,
    /// Expense accounts.
    pub expense_accounts: Vec<AccountLine>,
    /// Recorded income grouped by category, largest first.
    pub revenue_by_category: Vec<CategoryAmount>,
    /// Recorded expenses grouped by category, largest first.
    pub expenses_by_category: Vec<CategoryAmount>,
}

/// Balance sheet section (assets, liabilities, equity).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceSheetSection {
    /// Section total.
    pub total: Decimal,
    /// Accounts in this section, by name.
    pub accounts: Vec<AccountLine>,
}

/// Balance sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceSheet {
    /// Asset accounts.
    pub assets: BalanceSheetSection,
    /// Liability accounts.
    pub liabilities: BalanceSheetSection,
    /// Equity accounts.
    pub equity: BalanceSheetSection,
    /// Total assets.
    pub total_assets: Decimal,
    /// Total liabilities.
    pub total_liabilities: Decimal,
    /// Total equity.
    pub total_equity: Decimal,
    /// `total_liabilities + total_equity`.
    pub liabilities_and_equity: Decimal,
    /// Whether assets equal liabilities plus equity.
    pub is_balanced: bool,
    /// `total_assets - liabilities_and_equity`.
    pub discrepancy: Decimal,
    /// Human-readable warning when unbalanced.
    pub warning: Option<String>,
}

/// One trial balance row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrialBalanceLine {
    /// Account name.
    pub name: String,
    /// Account type.
    pub account_type: AccountType,
    /// Debit column.
    pub debit: Decimal,
    /// Credit column.
    pub credit: Decimal,
}

/// Trial balance of current account balances.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrialBalance {
    /// Rows by account name.
    pub lines: Vec<TrialBalanceLine>,
    /// Debit column total.
    pub total_debit: Decimal,
    /// Credit column total.
    pub total_credit: Decimal,
    /// Whether the columns agree.
    pub is_balanced: bool,
}
