//! Report generation service.
//!
//! Reports are recomputed from snapshots on every call; nothing is persisted.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::error::ReportError;
use super::types::{
    AccountLine, BalanceSheet, BalanceSheetSection, CashFlowBucket, CashFlowReport,
    CategoryAmount, IncomeStatement, TrialBalance, TrialBalanceLine,
};
use crate::calendar;
use crate::ledger::{Account, AccountType, NormalBalance};
use crate::records::{Transaction, TransactionType};

/// Service for generating financial reports.
pub struct ReportService;

impl ReportService {
    /// Generates a cash-flow report for `[start, end]`, both days inclusive.
    ///
    /// Income counts as inflow, expenses as outflow; transfers, adjustments
    /// and cancelled transactions are ignored. An empty range yields zeros.
    ///
    /// # Errors
    ///
    /// `InvalidDateRange` when `start > end`.
    pub fn cash_flow(
        transactions: &[Transaction],
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<CashFlowReport, ReportError> {
        if start > end {
            return Err(ReportError::InvalidDateRange { start, end });
        }

        let mut buckets: BTreeMap<NaiveDate, (Decimal, Decimal)> = calendar::month_starts(start, end)
            .into_iter()
            .map(|month| (month, (Decimal::ZERO, Decimal::ZERO)))
            .collect();

        for tx in transactions.iter().filter(|t| t.counts()) {
            let day = tx.day();
            if day < start || day > end {
                continue;
            }
            let bucket = buckets
                .entry(calendar::month_start(day))
                .or_insert((Decimal::ZERO, Decimal::ZERO));
            match tx.transaction_type {
                TransactionType::Income => bucket.0 += tx.amount,
                TransactionType::Expense => bucket.1 += tx.amount,
                TransactionType::Transfer | TransactionType::Adjustment => {}
            }
        }

        let series: Vec<CashFlowBucket> = buckets
            .into_iter()
            .map(|(month, (inflow, outflow))| CashFlowBucket {
                month: calendar::month_label(month),
                inflow,
                outflow,
                net: inflow - outflow,
            })
            .collect();

        let inflow: Decimal = series.iter().map(|b| b.inflow).sum();
        let outflow: Decimal = series.iter().map(|b| b.outflow).sum();

        Ok(CashFlowReport {
            start_date: start,
            end_date: end,
            inflow,
            outflow,
            net: inflow - outflow,
            series,
        })
    }

    /// Generates an income statement.
    ///
    /// Totals come from revenue and expense account balances; the category
    /// breakdown aggregates recorded income and expense transactions.
    #[must_use]
    pub fn income_statement(accounts: &[Account], transactions: &[Transaction]) -> IncomeStatement {
        let revenue_accounts = Self::lines_of(accounts, AccountType::Revenue);
        let expense_accounts = Self::lines_of(accounts, AccountType::Expense);
        let revenue: Decimal = revenue_accounts.iter().map(|a| a.balance).sum();
        let expenses: Decimal = expense_accounts.iter().map(|a| a.balance).sum();

        IncomeStatement {
            revenue,
            expenses,
            net_income: revenue - expenses,
            revenue_accounts,
            expense_accounts,
            revenue_by_category: Self::by_category(transactions, TransactionType::Income),
            expenses_by_category: Self::by_category(transactions, TransactionType::Expense),
        }
    }

    /// Generates a balance sheet and checks `assets = liabilities + equity`.
    ///
    /// An unbalanced sheet is still returned; it carries a warning instead.
    #[must_use]
    pub fn balance_sheet(accounts: &[Account]) -> BalanceSheet {
        let assets = Self::section(accounts, AccountType::Asset);
        let liabilities = Self::section(accounts, AccountType::Liability);
        let equity = Self::section(accounts, AccountType::Equity);

        let total_assets = assets.total;
        let total_liabilities = liabilities.total;
        let total_equity = equity.total;
        let liabilities_and_equity = total_liabilities + total_equity;
        let discrepancy = total_assets - liabilities_and_equity;
        let is_balanced = discrepancy.is_zero();

        let warning = (!is_balanced).then(|| {
            format!(
                "Total assets ({total_assets}) do not equal liabilities plus equity \
                 ({liabilities_and_equity}); discrepancy {discrepancy}"
            )
        });

        BalanceSheet {
            assets,
            liabilities,
            equity,
            total_assets,
            total_liabilities,
            total_equity,
            liabilities_and_equity,
            is_balanced,
            discrepancy,
            warning,
        }
    }

    /// Generates a trial balance: each balance in its normal column, negative
    /// balances flipped to the other side.
    #[must_use]
    pub fn trial_balance(accounts: &[Account]) -> TrialBalance {
        let mut sorted: Vec<&Account> = accounts.iter().collect();
        sorted.sort_by(|a, b| a.name.cmp(&b.name));

        let lines: Vec<TrialBalanceLine> = sorted
            .into_iter()
            .map(|account| {
                let (debit, credit) = match account.account_type.normal_balance() {
                    NormalBalance::DebitNormal if account.balance >= Decimal::ZERO => {
                        (account.balance, Decimal::ZERO)
                    }
                    NormalBalance::DebitNormal => (Decimal::ZERO, -account.balance),
                    NormalBalance::CreditNormal if account.balance >= Decimal::ZERO => {
                        (Decimal::ZERO, account.balance)
                    }
                    NormalBalance::CreditNormal => (-account.balance, Decimal::ZERO),
                };
                TrialBalanceLine {
                    name: account.name.clone(),
                    account_type: account.account_type,
                    debit,
                    credit,
                }
            })
            .collect();

        let total_debit: Decimal = lines.iter().map(|l| l.debit).sum();
        let total_credit: Decimal = lines.iter().map(|l| l.credit).sum();

        TrialBalance {
            lines,
            total_debit,
            total_credit,
            is_balanced: total_debit == total_credit,
        }
    }

    /// Groups non-cancelled transactions of `kind` by category, largest first
    /// (ties by name), with each category's share of the total.
    #[must_use]
    pub fn by_category(transactions: &[Transaction], kind: TransactionType) -> Vec<CategoryAmount> {
        let mut totals: HashMap<&str, Decimal> = HashMap::new();
        for tx in transactions
            .iter()
            .filter(|t| t.counts() && t.transaction_type == kind)
        {
            *totals.entry(tx.category.as_str()).or_default() += tx.amount;
        }

        let grand_total: Decimal = totals.values().copied().sum();
        let mut categories: Vec<CategoryAmount> = totals
            .into_iter()
            .map(|(category, amount)| CategoryAmount {
                category: category.to_string(),
                amount,
                percent: percent_of(amount, grand_total),
            })
            .collect();
        categories.sort_by(|a, b| b.amount.cmp(&a.amount).then(a.category.cmp(&b.category)));
        categories
    }

    fn lines_of(accounts: &[Account], account_type: AccountType) -> Vec<AccountLine> {
        let mut lines: Vec<AccountLine> = accounts
            .iter()
            .filter(|a| a.account_type == account_type)
            .map(AccountLine::from)
            .collect();
        lines.sort_by(|a, b| a.name.cmp(&b.name));
        lines
    }

    fn section(accounts: &[Account], account_type: AccountType) -> BalanceSheetSection {
        let accounts = Self::lines_of(accounts, account_type);
        BalanceSheetSection {
            total: accounts.iter().map(|a| a.balance).sum(),
            accounts,
        }
    }
}

/// `part / whole * 100` to two decimals; zero when `whole` is zero.
#[must_use]
pub fn percent_of(part: Decimal, whole: Decimal) -> Decimal {
    if whole.is_zero() {
        Decimal::ZERO
    } else {
        (part / whole * Decimal::ONE_HUNDRED).round_dp(2)
    }
}
