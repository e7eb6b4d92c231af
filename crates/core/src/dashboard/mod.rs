//! Dashboard metrics and chart series.

pub mod service;
pub mod types;

pub use service::{DashboardService, percent_change};
pub use types::*;
