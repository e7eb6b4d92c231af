//! ISO 4217 style currency codes.
//!
//! Amounts themselves are always `rust_decimal::Decimal`; this module only
//! guards the three-letter code stored next to them. No conversion between
//! currencies happens anywhere in the books.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error returned for a malformed currency code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid currency code '{0}': expected three ASCII letters")]
pub struct InvalidCurrencyCode(pub String);

/// A three-letter, upper-case currency code such as `USD`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CurrencyCode(String);

impl CurrencyCode {
    /// The books' default currency.
    pub const DEFAULT: &'static str = "USD";

    /// Parses and normalizes a currency code.
    ///
    /// # Errors
    ///
    /// Returns `InvalidCurrencyCode` unless the input is exactly three ASCII letters.
    pub fn parse(raw: &str) -> Result<Self, InvalidCurrencyCode> {
        let trimmed = raw.trim();
        if trimmed.len() == 3 && trimmed.chars().all(|c| c.is_ascii_alphabetic()) {
            Ok(Self(trimmed.to_ascii_uppercase()))
        } else {
            Err(InvalidCurrencyCode(raw.to_string()))
        }
    }

    /// Returns the code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for CurrencyCode {
    fn default() -> Self {
        Self(Self::DEFAULT.to_string())
    }
}

impl std::fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for CurrencyCode {
    type Err = InvalidCurrencyCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for CurrencyCode {
    type Error = InvalidCurrencyCode;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<CurrencyCode> for String {
    fn from(code: CurrencyCode) -> Self {
        code.0
    }
}
