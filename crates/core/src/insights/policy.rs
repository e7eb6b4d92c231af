//! Tunable thresholds for the insight rules.

use chrono::Duration;
use cogniflow_shared::config::InsightsConfig;
use rust_decimal::Decimal;

/// Thresholds shared by every rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsightPolicy {
    /// Amount above `multiplier x mean` of prior transactions is anomalous.
    pub large_amount_multiplier: Decimal,
    /// Window for the duplicate check, exclusive on both sides.
    pub duplicate_window: Duration,
    /// Trailing months for the cash-flow projection.
    pub lookback_months: u32,
    /// Months projected forward.
    pub projection_months: u32,
    /// Baseline as a fraction of the projection.
    pub baseline_factor: Decimal,
    /// Savings rate on the largest expense category.
    pub savings_rate: Decimal,
    /// Deductible share of quarterly expenses.
    pub deductible_share: Decimal,
    /// Flat tax rate.
    pub tax_rate: Decimal,
    /// Width of the deduplication bucket.
    pub dedup_window: Duration,
}

impl From<&InsightsConfig> for InsightPolicy {
    fn from(config: &InsightsConfig) -> Self {
        Self {
            large_amount_multiplier: config.large_amount_multiplier,
            duplicate_window: Duration::hours(config.duplicate_window_hours.max(0)),
            lookback_months: config.lookback_months.max(1),
            projection_months: config.projection_months,
            baseline_factor: config.baseline_factor,
            savings_rate: config.savings_rate,
            deductible_share: config.deductible_share,
            tax_rate: config.tax_rate,
            dedup_window: Duration::hours(config.dedup_window_hours.max(1)),
        }
    }
}

impl Default for InsightPolicy {
    fn default() -> Self {
        Self::from(&InsightsConfig::default())
    }
}
