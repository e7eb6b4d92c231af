//! Application configuration management.

use rust_decimal::Decimal;
use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration. Without a URL the server keeps its books in memory.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// JWT configuration.
    pub jwt: JwtConfig,
    /// Insight engine thresholds and scheduling.
    #[serde(default)]
    pub insights: InsightsConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Load the demo chart of accounts, transactions and invoices on startup.
    #[serde(default)]
    pub seed_demo_data: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            seed_demo_data: false,
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: Option<String>,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
        }
    }
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// JWT configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    /// Secret key for signing tokens.
    pub secret: String,
    /// Access token expiration in seconds.
    #[serde(default = "default_access_token_expiry")]
    pub access_token_expiry_secs: u64,
}

fn default_access_token_expiry() -> u64 {
    900 // 15 minutes
}

/// Heuristic thresholds for the insight rules.
///
/// Defaults reproduce the flat constants the product has always shipped with.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct InsightsConfig {
    /// A transaction larger than this multiple of the historical mean is an anomaly.
    pub large_amount_multiplier: Decimal,
    /// Same amount + category inside this window counts as a duplicate.
    pub duplicate_window_hours: i64,
    /// Trailing months used for the cash-flow projection.
    pub lookback_months: u32,
    /// Months projected forward.
    pub projection_months: u32,
    /// Stand-in for last year's figure, as a fraction of the projection.
    pub baseline_factor: Decimal,
    /// Savings assumed on the largest expense category.
    pub savings_rate: Decimal,
    /// Share of quarterly expenses assumed deductible.
    pub deductible_share: Decimal,
    /// Flat tax rate applied to deductible expenses.
    pub tax_rate: Decimal,
    /// Width of the insight deduplication bucket.
    pub dedup_window_hours: i64,
    /// Period of the background analysis job, `0` disables it.
    pub analysis_interval_secs: u64,
}

impl Default for InsightsConfig {
    fn default() -> Self {
        Self {
            large_amount_multiplier: Decimal::from(3),
            duplicate_window_hours: 24,
            lookback_months: 6,
            projection_months: 3,
            baseline_factor: Decimal::new(92, 2),
            savings_rate: Decimal::new(12, 2),
            deductible_share: Decimal::new(30, 2),
            tax_rate: Decimal::new(25, 2),
            dedup_window_hours: 24,
            analysis_interval_secs: 0,
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// Sources, later ones winning: `config/default`, `config/{RUN_MODE}`,
    /// then `COGNIFLOW__SECTION__KEY` environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("COGNIFLOW").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
