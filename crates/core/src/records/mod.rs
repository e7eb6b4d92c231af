//! Business transactions and invoices.
//!
//! Both carry unique `PREFIX-YYYYMM-NNNN` numbers and a status lifecycle.
//! Invoices report an effective status: pending past the due date reads as
//! overdue.

pub mod error;
pub mod service;
pub mod types;
pub mod validation;

pub use error::RecordError;
pub use service::RecordService;
pub use types::{
    Invoice, InvoiceFilter, InvoiceStatus, InvoiceType, InvoiceUpdate, NewInvoice, NewTransaction,
    Transaction, TransactionFilter, TransactionStatus, TransactionType, TransactionUpdate,
};
