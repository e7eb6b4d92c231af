//! Core bookkeeping, reporting and insight logic for Cogniflow.
//!
//! This crate has no web or database dependencies. Persistence goes through
//! the [`store::ErpStore`] trait; [`store::MemoryStore`] backs tests and
//! local runs.
//!
//! # Modules
//!
//! - `ledger` - Accounts and single-sided ledger postings
//! - `records` - Business transactions and invoices
//! - `reports` - Cash flow, income statement, balance sheet, trial balance
//! - `dashboard` - KPI and chart aggregation
//! - `insights` - Anomaly detection and periodic financial analysis
//! - `audit` - Append-only audit trail
//! - `numbering` - `PREFIX-YYYYMM-NNNN` business numbers
//! - `store` - Storage abstraction and in-memory backend

pub mod audit;
pub mod calendar;
pub mod dashboard;
pub mod demo;
pub mod insights;
pub mod ledger;
pub mod numbering;
pub mod records;
pub mod reports;
pub mod store;
