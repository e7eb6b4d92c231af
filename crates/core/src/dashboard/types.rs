//! Dashboard data types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::reports::CategoryAmount;

/// Headline figures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardKpis {
    /// Day the figures are computed for.
    pub as_of: NaiveDate,
    /// `revenue - expenses`.
    pub cash_flow: Decimal,
    /// All recorded income.
    pub revenue: Decimal,
    /// All recorded expenses.
    pub expenses: Decimal,
    /// Sum of asset account balances.
    pub cash_position: Decimal,
    /// Open receivable invoices.
    pub outstanding_receivables: Decimal,
    /// Open payable invoices.
    pub outstanding_payables: Decimal,
    /// Open invoices past their due date.
    pub overdue_invoices: usize,
    /// Insights nobody has read yet.
    pub unread_insights: usize,
    /// Income this month against last month, percent.
    pub revenue_change_percent: Decimal,
    /// Expenses this month against last month, percent.
    pub expense_change_percent: Decimal,
}

/// Monthly revenue and expense series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlySeries {
    /// Month labels (`YYYY-MM`), oldest first.
    pub labels: Vec<String>,
    /// Income per month.
    pub revenue: Vec<Decimal>,
    /// Expenses per month.
    pub expenses: Vec<Decimal>,
}

/// Chart data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardCharts {
    /// Trailing six months.
    pub monthly: MonthlySeries,
    /// Expense breakdown, largest first.
    pub expense_categories: Vec<CategoryAmount>,
}
