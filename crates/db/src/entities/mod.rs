//! `SeaORM` entities, one module per table.

pub mod accounts;
pub mod ai_insights;
pub mod audit_logs;
pub mod invoices;
pub mod ledger_entries;
pub mod number_sequences;
pub mod transactions;
