//! Financial report generation.
//!
//! Pure functions over account and transaction snapshots:
//! - Cash flow by month
//! - Income statement
//! - Balance sheet with the accounting identity check
//! - Trial balance

pub mod error;
pub mod service;
pub mod types;


pub use error::ReportError;
pub use service::{ReportService, percent_of};
pub use types::*;
