//! Rule-based advisory insights.
//!
//! Anomaly checks run against every newly recorded transaction; the periodic
//! rules (cash-flow prediction, cost saving, tax deduction, book balance) run
//! on demand or from the background job. Every stored insight carries a dedup
//! key so repeated analysis inside one window stores nothing new.

pub mod engine;
pub mod error;
pub mod policy;
pub mod rules;
pub mod service;
pub mod types;

pub use engine::{InsightEngine, dedup_key};
pub use error::InsightError;
pub use policy::InsightPolicy;
pub use rules::{AnalysisContext, AnomalyCheck, AnomalyDetector, InsightRule};
pub use service::InsightService;
pub use types::{AiInsight, AnalysisSummary, InsightDraft, InsightFilter, InsightType, Severity};
