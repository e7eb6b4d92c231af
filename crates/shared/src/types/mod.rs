//! Common types used across the application.

pub mod amount;
pub mod currency;
pub mod id;

pub use amount::{AmountError, check_amount};
pub use currency::CurrencyCode;
pub use id::*;
