//! Dashboard aggregation.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::types::{DashboardCharts, DashboardKpis, MonthlySeries};
use crate::calendar;
use crate::insights::{AiInsight, InsightFilter};
use crate::ledger::{Account, AccountFilter, AccountType};
use crate::records::{
    Invoice, InvoiceFilter, InvoiceStatus, InvoiceType, Transaction, TransactionFilter,
    TransactionType,
};
use crate::reports::ReportService;
use crate::store::{SharedStore, StoreResult};

/// Months shown on the revenue chart.
const CHART_MONTHS: u32 = 6;

/// Dashboard service.
#[derive(Clone)]
pub struct DashboardService {
    store: SharedStore,
}

impl DashboardService {
    /// Creates a dashboard service.
    #[must_use]
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// Headline figures as of `today`.
    ///
    /// # Errors
    ///
    /// Store failures only.
    pub async fn kpis(&self, today: NaiveDate) -> StoreResult<DashboardKpis> {
        let transactions = self
            .store
            .list_transactions(&TransactionFilter::default())
            .await?;
        let accounts = self.store.list_accounts(&AccountFilter::default()).await?;
        let invoices = self.store.list_invoices(&InvoiceFilter::default()).await?;
        let unread = self
            .store
            .list_insights(&InsightFilter {
                is_read: Some(false),
                ..InsightFilter::default()
            })
            .await?;

        Ok(Self::compute_kpis(today, &transactions, &accounts, &invoices, &unread))
    }

    /// Chart series as of `today`.
    ///
    /// # Errors
    ///
    /// Store failures only.
    pub async fn charts(&self, today: NaiveDate) -> StoreResult<DashboardCharts> {
        let transactions = self
            .store
            .list_transactions(&TransactionFilter::default())
            .await?;
        Ok(Self::compute_charts(today, &transactions))
    }

    /// Pure KPI computation over snapshots.
    #[must_use]
    pub fn compute_kpis(
        today: NaiveDate,
        transactions: &[Transaction],
        accounts: &[Account],
        invoices: &[Invoice],
        unread: &[AiInsight],
    ) -> DashboardKpis {
        let revenue = sum_of(transactions, TransactionType::Income, |_| true);
        let expenses = sum_of(transactions, TransactionType::Expense, |_| true);

        let this_month = calendar::month_start(today);
        let last_month = calendar::months_back(today, 1);
        let in_month = |month: NaiveDate| move |t: &Transaction| calendar::month_start(t.day()) == month;

        let revenue_now = sum_of(transactions, TransactionType::Income, in_month(this_month));
        let revenue_before = sum_of(transactions, TransactionType::Income, in_month(last_month));
        let expenses_now = sum_of(transactions, TransactionType::Expense, in_month(this_month));
        let expenses_before = sum_of(transactions, TransactionType::Expense, in_month(last_month));

        let open: Vec<Invoice> = invoices
            .iter()
            .filter(|i| !i.status.is_terminal())
            .map(|i| i.clone().as_of(today))
            .collect();
        let outstanding = |kind: InvoiceType| -> Decimal {
            open.iter()
                .filter(|i| i.invoice_type == kind)
                .map(|i| i.amount)
                .sum()
        };

        DashboardKpis {
            as_of: today,
            cash_flow: revenue - expenses,
            revenue,
            expenses,
            cash_position: accounts
                .iter()
                .filter(|a| a.account_type == AccountType::Asset)
                .map(|a| a.balance)
                .sum(),
            outstanding_receivables: outstanding(InvoiceType::AccountsReceivable),
            outstanding_payables: outstanding(InvoiceType::AccountsPayable),
            overdue_invoices: open
                .iter()
                .filter(|i| i.status == InvoiceStatus::Overdue)
                .count(),
            unread_insights: unread.iter().filter(|i| !i.is_read).count(),
            revenue_change_percent: percent_change(revenue_now, revenue_before),
            expense_change_percent: percent_change(expenses_now, expenses_before),
        }
    }

    /// Pure chart computation over a transaction snapshot.
    #[must_use]
    pub fn compute_charts(today: NaiveDate, transactions: &[Transaction]) -> DashboardCharts {
        let first = calendar::months_back(today, CHART_MONTHS - 1);
        let months = calendar::month_starts(first, today);

        let mut monthly = MonthlySeries {
            labels: Vec::with_capacity(months.len()),
            revenue: Vec::with_capacity(months.len()),
            expenses: Vec::with_capacity(months.len()),
        };
        for month in months {
            let in_month = |t: &Transaction| calendar::month_start(t.day()) == month;
            monthly.labels.push(calendar::month_label(month));
            monthly
                .revenue
                .push(sum_of(transactions, TransactionType::Income, in_month));
            monthly
                .expenses
                .push(sum_of(transactions, TransactionType::Expense, in_month));
        }

        DashboardCharts {
            monthly,
            expense_categories: ReportService::by_category(transactions, TransactionType::Expense),
        }
    }
}

fn sum_of(
    transactions: &[Transaction],
    kind: TransactionType,
    include: impl Fn(&Transaction) -> bool,
) -> Decimal {
    transactions
        .iter()
        .filter(|t| t.counts() && t.transaction_type == kind && include(t))
        .map(|t| t.amount)
        .sum()
}

/// Percent change from `previous` to `current`, two decimals.
///
/// From zero, any increase reads as 100% and no change as 0%.
#[must_use]
pub fn percent_change(current: Decimal, previous: Decimal) -> Decimal {
    if previous.is_zero() {
        return if current > Decimal::ZERO {
            Decimal::ONE_HUNDRED
        } else {
            Decimal::ZERO
        };
    }
    ((current - previous) / previous.abs() * Decimal::ONE_HUNDRED).round_dp(2)
}

#[cfg(test)]
#[path = "service_tests.rs"]
mod tests;
