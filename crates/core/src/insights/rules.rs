//! Insight rules.
//!
//! Each rule is an independent strategy over an [`AnalysisContext`] snapshot.
//! Rules never touch the store; the engine persists what they produce.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde_json::json;

use super::policy::InsightPolicy;
use super::types::{InsightDraft, InsightType, Severity};
use crate::calendar;
use crate::ledger::Account;
use crate::records::{Transaction, TransactionType};
use crate::reports::ReportService;

/// Rule identifiers, part of the dedup key.
pub mod ids {
    /// Transaction anomalies.
    pub const ANOMALY: &str = "transaction-anomaly";
    /// Cash-flow projection.
    pub const CASH_FLOW_PREDICTION: &str = "cash-flow-prediction";
    /// Largest expense category.
    pub const COST_SAVING: &str = "cost-saving";
    /// Quarterly tax deductions.
    pub const TAX_DEDUCTION: &str = "tax-deduction";
    /// Balance sheet identity.
    pub const BOOK_BALANCE: &str = "book-balance";
}

/// Snapshot a rule evaluates.
#[derive(Debug, Clone, Copy)]
pub struct AnalysisContext<'a> {
    /// Evaluation time.
    pub now: DateTime<Utc>,
    /// All stored transactions.
    pub transactions: &'a [Transaction],
    /// All accounts.
    pub accounts: &'a [Account],
    /// Thresholds.
    pub policy: &'a InsightPolicy,
}

/// A periodic analysis rule.
pub trait InsightRule: Send + Sync {
    /// Stable identifier.
    fn id(&self) -> &'static str;

    /// Drafts produced for this snapshot, possibly none.
    fn evaluate(&self, ctx: &AnalysisContext<'_>) -> Vec<InsightDraft>;
}

/// `round(amount / 1000)`, half away from zero.
fn thousands(amount: Decimal) -> Decimal {
    (amount / Decimal::ONE_THOUSAND).round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

fn money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

// ============================================================================
// Anomalies
// ============================================================================

/// One reason a transaction may be anomalous.
pub trait AnomalyCheck: Send + Sync {
    /// Returns the reason when `candidate` trips this check.
    ///
    /// `others` holds every non-cancelled transaction except the candidate;
    /// `prior` is the subset dated at or before it.
    fn check(
        &self,
        candidate: &Transaction,
        others: &[&Transaction],
        prior: &[&Transaction],
        policy: &InsightPolicy,
    ) -> Option<&'static str>;
}

/// Amount far above the mean of prior transactions.
pub struct LargeAmountCheck;

impl AnomalyCheck for LargeAmountCheck {
    fn check(
        &self,
        candidate: &Transaction,
        _others: &[&Transaction],
        prior: &[&Transaction],
        policy: &InsightPolicy,
    ) -> Option<&'static str> {
        if prior.is_empty() {
            return None;
        }
        let total: Decimal = prior.iter().map(|t| t.amount).sum();
        let mean = total / Decimal::from(prior.len());
        (candidate.amount > mean * policy.large_amount_multiplier)
            .then_some("Transaction amount is significantly higher than average")
    }
}

/// Category never used before.
pub struct NovelCategoryCheck;

impl AnomalyCheck for NovelCategoryCheck {
    fn check(
        &self,
        candidate: &Transaction,
        _others: &[&Transaction],
        prior: &[&Transaction],
        _policy: &InsightPolicy,
    ) -> Option<&'static str> {
        if prior.is_empty() {
            return None;
        }
        (!prior.iter().any(|t| t.category == candidate.category))
            .then_some("Transaction category is new and has not been used before")
    }
}

/// Same amount and category close in time.
pub struct DuplicateCheck;

impl AnomalyCheck for DuplicateCheck {
    fn check(
        &self,
        candidate: &Transaction,
        others: &[&Transaction],
        _prior: &[&Transaction],
        policy: &InsightPolicy,
    ) -> Option<&'static str> {
        others
            .iter()
            .any(|t| {
                t.amount == candidate.amount
                    && t.category == candidate.category
                    && (t.date - candidate.date).abs() < policy.duplicate_window
            })
            .then_some("Potential duplicate transaction detected")
    }
}

/// Runs every anomaly check against one transaction.
pub struct AnomalyDetector {
    checks: Vec<Box<dyn AnomalyCheck>>,
}

impl Default for AnomalyDetector {
    fn default() -> Self {
        Self::new(vec![
            Box::new(LargeAmountCheck),
            Box::new(NovelCategoryCheck),
            Box::new(DuplicateCheck),
        ])
    }
}

impl AnomalyDetector {
    /// Creates a detector with the given checks, evaluated in order.
    #[must_use]
    pub fn new(checks: Vec<Box<dyn AnomalyCheck>>) -> Self {
        Self { checks }
    }

    /// Evaluates `candidate` against `history`, which may include the
    /// candidate itself. Produces one draft listing every reason, or none.
    #[must_use]
    pub fn detect(
        &self,
        candidate: &Transaction,
        history: &[Transaction],
        policy: &InsightPolicy,
    ) -> Option<InsightDraft> {
        if !candidate.counts() {
            return None;
        }

        let others: Vec<&Transaction> = history
            .iter()
            .filter(|t| t.counts() && t.transaction_number != candidate.transaction_number)
            .collect();
        let prior: Vec<&Transaction> = others
            .iter()
            .copied()
            .filter(|t| t.date <= candidate.date)
            .collect();

        let reasons: Vec<&'static str> = self
            .checks
            .iter()
            .filter_map(|check| check.check(candidate, &others, &prior, policy))
            .collect();
        if reasons.is_empty() {
            return None;
        }

        Some(InsightDraft {
            rule: ids::ANOMALY,
            subject: candidate.transaction_number.clone(),
            insight_type: InsightType::Anomaly,
            title: "Unusual Transaction Detected".to_string(),
            description: format!(
                "Transaction {} may require review. {}.",
                candidate.transaction_number,
                reasons.join(". ")
            ),
            severity: Severity::Warning,
            data: json!({
                "transactionId": candidate.id,
                "transactionNumber": candidate.transaction_number,
                "amount": candidate.amount,
                "category": candidate.category,
                "reasons": reasons,
            }),
        })
    }
}

// ============================================================================
// Periodic rules
// ============================================================================

/// Projects next quarter's net cash flow from the trailing months.
pub struct CashFlowPredictionRule;

impl InsightRule for CashFlowPredictionRule {
    fn id(&self) -> &'static str {
        ids::CASH_FLOW_PREDICTION
    }

    fn evaluate(&self, ctx: &AnalysisContext<'_>) -> Vec<InsightDraft> {
        let policy = ctx.policy;
        let today = ctx.now.date_naive();
        let window_start = calendar::months_back(today, policy.lookback_months);

        let mut income = Decimal::ZERO;
        let mut expenses = Decimal::ZERO;
        let mut seen = 0usize;
        for tx in ctx
            .transactions
            .iter()
            .filter(|t| t.counts() && t.day() >= window_start && t.date <= ctx.now)
        {
            seen += 1;
            match tx.transaction_type {
                TransactionType::Income => income += tx.amount,
                TransactionType::Expense => expenses += tx.amount,
                TransactionType::Transfer | TransactionType::Adjustment => {}
            }
        }
        if seen == 0 {
            return Vec::new();
        }

        let months = Decimal::from(policy.lookback_months);
        let projection =
            Decimal::from(policy.projection_months) * (income / months - expenses / months);
        let baseline = projection * policy.baseline_factor;
        // Sign follows the projection: a projected shortfall reads as a negative change.
        let percent_change = if baseline.is_zero() {
            Decimal::ZERO
        } else {
            (projection - baseline) / baseline.abs() * Decimal::ONE_HUNDRED
        }
        .round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero);

        let severity = if projection < Decimal::ZERO {
            Severity::Warning
        } else {
            Severity::Info
        };

        vec![InsightDraft {
            rule: ids::CASH_FLOW_PREDICTION,
            subject: calendar::month_label(today),
            insight_type: InsightType::Prediction,
            title: "Cash Flow Prediction".to_string(),
            description: format!(
                "Based on current trends, projected cash flow for next quarter is estimated at ${}K, {:.1}% YoY.",
                thousands(projection),
                percent_change
            ),
            severity,
            data: json!({
                "predictedCashFlow": money(projection),
                "percentChange": percent_change,
                "windowStart": window_start,
                "transactionsConsidered": seen,
            }),
        }]
    }
}

/// Suggests savings on the largest expense category.
pub struct CostSavingRule;

impl InsightRule for CostSavingRule {
    fn id(&self) -> &'static str {
        ids::COST_SAVING
    }

    fn evaluate(&self, ctx: &AnalysisContext<'_>) -> Vec<InsightDraft> {
        let mut by_category: BTreeMap<&str, Decimal> = BTreeMap::new();
        for tx in ctx
            .transactions
            .iter()
            .filter(|t| t.counts() && t.transaction_type == TransactionType::Expense)
        {
            *by_category.entry(tx.category.as_str()).or_default() += tx.amount;
        }

        // First strictly larger total wins, so ties resolve alphabetically.
        let mut highest: Option<(&str, Decimal)> = None;
        for (category, total) in by_category {
            if highest.is_none_or(|(_, best)| total > best) {
                highest = Some((category, total));
            }
        }
        let Some((category, total)) = highest.filter(|(_, total)| *total > Decimal::ZERO) else {
            return Vec::new();
        };

        let rate_percent = (ctx.policy.savings_rate * Decimal::ONE_HUNDRED)
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
        vec![InsightDraft {
            rule: ids::COST_SAVING,
            subject: category.to_string(),
            insight_type: InsightType::Recommendation,
            title: "Budget Optimization".to_string(),
            description: format!(
                "AI analysis suggests potential {rate_percent}% savings in {} costs by adjusting procurement strategies.",
                category.to_lowercase()
            ),
            severity: Severity::Info,
            data: json!({
                "category": category,
                "currentSpend": total,
                "potentialSavings": money(total * ctx.policy.savings_rate),
            }),
        }]
    }
}

/// Estimates deductible expenses for the current quarter.
pub struct TaxDeductionRule;

impl InsightRule for TaxDeductionRule {
    fn id(&self) -> &'static str {
        ids::TAX_DEDUCTION
    }

    fn evaluate(&self, ctx: &AnalysisContext<'_>) -> Vec<InsightDraft> {
        let today = ctx.now.date_naive();
        let (start, end) = calendar::quarter_bounds(today);
        let quarter_expenses: Decimal = ctx
            .transactions
            .iter()
            .filter(|t| {
                t.counts()
                    && t.transaction_type == TransactionType::Expense
                    && (start..=end).contains(&t.day())
            })
            .map(|t| t.amount)
            .sum();

        let deductions = quarter_expenses * ctx.policy.deductible_share * ctx.policy.tax_rate;
        if deductions <= Decimal::ZERO {
            return Vec::new();
        }

        let quarter = calendar::quarter(today);
        let year = today.year();
        vec![InsightDraft {
            rule: ids::TAX_DEDUCTION,
            subject: format!("{year}-Q{quarter}"),
            insight_type: InsightType::Optimization,
            title: "Tax Optimization".to_string(),
            description: format!(
                "Identified potential tax deductions worth ${}K for Q{quarter} based on current financial activity.",
                thousands(deductions)
            ),
            severity: Severity::Info,
            data: json!({
                "quarter": format!("Q{quarter}"),
                "year": year,
                "potentialDeductions": money(deductions),
            }),
        }]
    }
}

/// Flags books where assets differ from liabilities plus equity.
pub struct BookBalanceRule;

impl InsightRule for BookBalanceRule {
    fn id(&self) -> &'static str {
        ids::BOOK_BALANCE
    }

    fn evaluate(&self, ctx: &AnalysisContext<'_>) -> Vec<InsightDraft> {
        let sheet = ReportService::balance_sheet(ctx.accounts);
        if sheet.is_balanced {
            return Vec::new();
        }

        vec![InsightDraft {
            rule: ids::BOOK_BALANCE,
            subject: "balance-sheet".to_string(),
            insight_type: InsightType::Anomaly,
            title: "Balance Sheet Out of Balance".to_string(),
            description: format!(
                "Total assets of ${} differ from liabilities plus equity of ${} by ${}.",
                sheet.total_assets, sheet.liabilities_and_equity, sheet.discrepancy
            ),
            severity: Severity::Warning,
            data: json!({
                "totalAssets": sheet.total_assets,
                "totalLiabilities": sheet.total_liabilities,
                "totalEquity": sheet.total_equity,
                "discrepancy": sheet.discrepancy,
            }),
        }]
    }
}

#[cfg(test)]
#[path = "rules_tests.rs"]
mod tests;
