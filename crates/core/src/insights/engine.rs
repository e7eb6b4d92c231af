//! Rule registry and insight materialization.

use chrono::{DateTime, Duration, Utc};
use cogniflow_shared::types::InsightId;
use sha2::{Digest, Sha256};

use super::policy::InsightPolicy;
use super::rules::{
    AnalysisContext, AnomalyDetector, BookBalanceRule, CashFlowPredictionRule, CostSavingRule,
    InsightRule, TaxDeductionRule,
};
use super::types::{AiInsight, InsightDraft};
use crate::ledger::Account;
use crate::records::Transaction;

/// Evaluates the anomaly detector and the periodic rules.
pub struct InsightEngine {
    policy: InsightPolicy,
    detector: AnomalyDetector,
    rules: Vec<Box<dyn InsightRule>>,
}

impl InsightEngine {
    /// Creates an engine with explicit rules.
    #[must_use]
    pub fn new(
        policy: InsightPolicy,
        detector: AnomalyDetector,
        rules: Vec<Box<dyn InsightRule>>,
    ) -> Self {
        Self {
            policy,
            detector,
            rules,
        }
    }

    /// The default rule set: cash-flow prediction, cost saving, tax deduction
    /// and the balance-sheet check.
    #[must_use]
    pub fn standard(policy: InsightPolicy) -> Self {
        Self::new(
            policy,
            AnomalyDetector::default(),
            vec![
                Box::new(CashFlowPredictionRule),
                Box::new(CostSavingRule),
                Box::new(TaxDeductionRule),
                Box::new(BookBalanceRule),
            ],
        )
    }

    /// Active thresholds.
    #[must_use]
    pub fn policy(&self) -> &InsightPolicy {
        &self.policy
    }

    /// Identifiers of the periodic rules, in evaluation order.
    pub fn rule_ids(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.rules.iter().map(|r| r.id())
    }

    /// Runs the anomaly checks for one transaction.
    #[must_use]
    pub fn detect_anomalies(
        &self,
        candidate: &Transaction,
        history: &[Transaction],
    ) -> Option<InsightDraft> {
        self.detector.detect(candidate, history, &self.policy)
    }

    /// Runs every periodic rule over a snapshot.
    #[must_use]
    pub fn analyze(
        &self,
        now: DateTime<Utc>,
        transactions: &[Transaction],
        accounts: &[Account],
    ) -> Vec<InsightDraft> {
        let ctx = AnalysisContext {
            now,
            transactions,
            accounts,
            policy: &self.policy,
        };
        self.rules
            .iter()
            .flat_map(|rule| {
                let drafts = rule.evaluate(&ctx);
                tracing::debug!(rule = rule.id(), produced = drafts.len(), "Insight rule evaluated");
                drafts
            })
            .collect()
    }

    /// Turns a draft into a storable insight created at `now`.
    #[must_use]
    pub fn materialize(&self, draft: InsightDraft, now: DateTime<Utc>) -> AiInsight {
        let dedup_key = dedup_key(draft.rule, &draft.subject, now, self.policy.dedup_window);
        AiInsight {
            id: InsightId::new(),
            insight_type: draft.insight_type,
            title: draft.title,
            description: draft.description,
            severity: draft.severity,
            data: draft.data,
            is_read: false,
            dedup_key,
            created_at: now,
        }
    }
}

/// `sha256(rule | subject | bucket)` as lowercase hex, where `bucket` is
/// `at` divided into windows of `window` since the epoch.
#[must_use]
pub fn dedup_key(rule: &str, subject: &str, at: DateTime<Utc>, window: Duration) -> String {
    let window_secs = window.num_seconds().max(1);
    let bucket = at.timestamp().div_euclid(window_secs);

    let mut hasher = Sha256::new();
    hasher.update(rule.as_bytes());
    hasher.update(b"|");
    hasher.update(subject.as_bytes());
    hasher.update(b"|");
    hasher.update(bucket.to_string().as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_dedup_key_is_stable_within_window() {
        let window = Duration::hours(24);
        let morning = Utc.with_ymd_and_hms(2026, 10, 17, 1, 0, 0).unwrap();
        let evening = Utc.with_ymd_and_hms(2026, 10, 17, 23, 0, 0).unwrap();
        let next_day = Utc.with_ymd_and_hms(2026, 10, 18, 1, 0, 0).unwrap();

        let key = dedup_key("cost-saving", "Rent", morning, window);
        assert_eq!(key.len(), 64);
        assert_eq!(key, dedup_key("cost-saving", "Rent", evening, window));
        assert_ne!(key, dedup_key("cost-saving", "Rent", next_day, window));
        assert_ne!(key, dedup_key("cost-saving", "Payroll", morning, window));
        assert_ne!(key, dedup_key("tax-deduction", "Rent", morning, window));
    }

    #[test]
    fn test_standard_rule_order() {
        let engine = InsightEngine::standard(InsightPolicy::default());
        let ids: Vec<&str> = engine.rule_ids().collect();
        assert_eq!(
            ids,
            ["cash-flow-prediction", "cost-saving", "tax-deduction", "book-balance"]
        );
    }
}
