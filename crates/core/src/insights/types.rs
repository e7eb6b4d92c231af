//! Insight records.

use chrono::{DateTime, Utc};
use cogniflow_shared::types::InsightId;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Kind of advisory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightType {
    /// Something about a transaction or the books looks wrong.
    Anomaly,
    /// Forward-looking projection.
    Prediction,
    /// Suggested spending change.
    Recommendation,
    /// Suggested tax or structural change.
    Optimization,
}

impl InsightType {
    /// Stored name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Anomaly => "anomaly",
            Self::Prediction => "prediction",
            Self::Recommendation => "recommendation",
            Self::Optimization => "optimization",
        }
    }
}

/// Insight severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational.
    #[default]
    Info,
    /// Needs a look.
    Warning,
    /// Needs action.
    Critical,
}

impl Severity {
    /// Stored name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Critical => "critical",
        }
    }
}

/// A persisted insight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiInsight {
    /// Insight ID.
    pub id: InsightId,
    /// Insight type.
    #[serde(rename = "type")]
    pub insight_type: InsightType,
    /// Short title.
    pub title: String,
    /// Human-readable description with the computed figures.
    pub description: String,
    /// Severity.
    pub severity: Severity,
    /// Rule-specific payload.
    pub data: Value,
    /// Whether a user has acknowledged it.
    pub is_read: bool,
    /// `sha256(rule | subject | time bucket)`, unique per store.
    #[serde(skip_serializing)]
    pub dedup_key: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// What a rule wants to say, before identity and dedup key are assigned.
#[derive(Debug, Clone, PartialEq)]
pub struct InsightDraft {
    /// Rule that produced the draft.
    pub rule: &'static str,
    /// What the draft is about (transaction number, category, quarter...).
    pub subject: String,
    /// Insight type.
    pub insight_type: InsightType,
    /// Short title.
    pub title: String,
    /// Description.
    pub description: String,
    /// Severity.
    pub severity: Severity,
    /// Rule-specific payload.
    pub data: Value,
}

/// Insight list filter.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightFilter {
    /// Only this type.
    #[serde(rename = "type")]
    pub insight_type: Option<InsightType>,
    /// Only read (or unread) insights.
    pub is_read: Option<bool>,
    /// Maximum number of rows, newest first.
    pub limit: Option<u64>,
}

impl InsightFilter {
    /// Whether an insight passes the equality filters.
    #[must_use]
    pub fn matches(&self, insight: &AiInsight) -> bool {
        self.insight_type.is_none_or(|t| t == insight.insight_type)
            && self.is_read.is_none_or(|r| r == insight.is_read)
    }
}

/// Outcome of an analysis run.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisSummary {
    /// Drafts produced by the rules.
    pub generated: usize,
    /// Drafts suppressed by deduplication.
    pub suppressed: usize,
    /// Newly stored insights.
    pub insights: Vec<AiInsight>,
}
