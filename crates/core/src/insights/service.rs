//! Insight service: runs the engine against the store and persists results.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use cogniflow_shared::AppError;
use cogniflow_shared::types::{InsightId, UserId};
use serde_json::json;

use super::engine::InsightEngine;
use super::error::InsightError;
use super::rules::{AnalysisContext, BookBalanceRule, InsightRule};
use super::types::{AiInsight, AnalysisSummary, InsightDraft, InsightFilter};
use crate::audit::{self, AuditAction};
use crate::ledger::{Account, AccountFilter};
use crate::records::{Transaction, TransactionFilter};
use crate::store::SharedStore;

/// Insight service.
#[derive(Clone)]
pub struct InsightService {
    store: SharedStore,
    engine: Arc<InsightEngine>,
}

impl InsightService {
    /// Creates an insight service.
    #[must_use]
    pub fn new(store: SharedStore, engine: InsightEngine) -> Self {
        Self {
            store,
            engine: Arc::new(engine),
        }
    }

    /// Evaluates the anomaly checks for a freshly recorded transaction and
    /// stores at most one insight.
    ///
    /// # Errors
    ///
    /// Store failures only.
    pub async fn detect_anomalies(
        &self,
        transaction: &Transaction,
    ) -> Result<Option<AiInsight>, InsightError> {
        let history = self
            .store
            .list_transactions(&TransactionFilter::default())
            .await?;

        let Some(draft) = self.engine.detect_anomalies(transaction, &history) else {
            return Ok(None);
        };

        let stored = self.persist(vec![draft], Utc::now()).await?;
        if let Some(insight) = stored.insights.first() {
            tracing::info!(
                transaction_number = %transaction.transaction_number,
                insight_id = %insight.id,
                "Anomaly flagged"
            );
        }
        Ok(stored.insights.into_iter().next())
    }

    /// Runs every periodic rule over current books at `now`.
    ///
    /// `actor` is `None` for the background job; manual runs are audited.
    ///
    /// # Errors
    ///
    /// Store failures only.
    pub async fn run_analysis(
        &self,
        actor: Option<UserId>,
        now: DateTime<Utc>,
    ) -> Result<AnalysisSummary, InsightError> {
        let transactions = self
            .store
            .list_transactions(&TransactionFilter::default())
            .await?;
        let accounts = self.store.list_accounts(&AccountFilter::default()).await?;

        let drafts = self.engine.analyze(now, &transactions, &accounts);
        let summary = self.persist(drafts, now).await?;

        tracing::info!(
            generated = summary.generated,
            stored = summary.insights.len(),
            suppressed = summary.suppressed,
            "Insight analysis completed"
        );

        if let Some(actor) = actor {
            audit::record(
                self.store.as_ref(),
                actor,
                AuditAction::Analyze,
                "ai_insight",
                "analysis",
                json!({
                    "generated": summary.generated,
                    "stored": summary.insights.len(),
                    "suppressed": summary.suppressed,
                }),
            )
            .await;
        }

        Ok(summary)
    }

    /// Records a deduplicated warning when `accounts` violate
    /// `assets = liabilities + equity`. Balanced books store nothing.
    ///
    /// # Errors
    ///
    /// Store failures only.
    pub async fn flag_unbalanced_books(
        &self,
        accounts: &[Account],
        now: DateTime<Utc>,
    ) -> Result<Option<AiInsight>, InsightError> {
        let ctx = AnalysisContext {
            now,
            transactions: &[],
            accounts,
            policy: self.engine.policy(),
        };
        let drafts = BookBalanceRule.evaluate(&ctx);
        if drafts.is_empty() {
            return Ok(None);
        }

        let inconsistency = AppError::InconsistentState(
            drafts
                .iter()
                .map(|d| d.description.clone())
                .collect::<Vec<_>>()
                .join(" "),
        );
        tracing::warn!(error = %inconsistency, "Books are out of balance");

        let summary = self.persist(drafts, now).await?;
        Ok(summary.insights.into_iter().next())
    }

    /// Lists insights, newest first.
    ///
    /// # Errors
    ///
    /// Store failures only.
    pub async fn list(&self, filter: &InsightFilter) -> Result<Vec<AiInsight>, InsightError> {
        Ok(self.store.list_insights(filter).await?)
    }

    /// Looks up an insight.
    ///
    /// # Errors
    ///
    /// `NotFound` if absent.
    pub async fn get(&self, id: InsightId) -> Result<AiInsight, InsightError> {
        self.store
            .find_insight(id)
            .await?
            .ok_or(InsightError::NotFound(id))
    }

    /// Acknowledges an insight.
    ///
    /// # Errors
    ///
    /// `NotFound` if absent.
    pub async fn mark_read(&self, actor: UserId, id: InsightId) -> Result<AiInsight, InsightError> {
        let insight = self.store.mark_insight_read(id).await?;

        audit::record(
            self.store.as_ref(),
            actor,
            AuditAction::Update,
            "ai_insight",
            id,
            json!({ "isRead": true }),
        )
        .await;

        Ok(insight)
    }

    async fn persist(
        &self,
        drafts: Vec<InsightDraft>,
        now: DateTime<Utc>,
    ) -> Result<AnalysisSummary, InsightError> {
        let mut summary = AnalysisSummary {
            generated: drafts.len(),
            ..AnalysisSummary::default()
        };

        for draft in drafts {
            let rule = draft.rule;
            let insight = self.engine.materialize(draft, now);
            if self.store.insert_insight_if_absent(insight.clone()).await? {
                summary.insights.push(insight);
            } else {
                tracing::debug!(rule, "Insight suppressed as duplicate");
                summary.suppressed += 1;
            }
        }

        Ok(summary)
    }
}

#[cfg(test)]
#[path = "service_tests.rs"]
mod tests;
