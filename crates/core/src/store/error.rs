//! Store error types.

use thiserror::Error;

/// Store operation errors.
///
/// `entity` is one of `"account"`, `"ledger entry"`, `"transaction"`,
/// `"invoice"`, `"insight"`; `key` is the business key that clashed or was
/// missing (name, number or id).
#[derive(Debug, Error)]
pub enum StoreError {
    /// Uniqueness constraint violated.
    #[error("{entity} '{key}' already exists")]
    Duplicate {
        /// Entity kind.
        entity: &'static str,
        /// Conflicting key.
        key: String,
    },

    /// Referenced row does not exist.
    #[error("{entity} '{key}' not found")]
    NotFound {
        /// Entity kind.
        entity: &'static str,
        /// Missing key.
        key: String,
    },

    /// Posting against a deactivated account.
    #[error("account '{0}' is inactive")]
    AccountInactive(String),

    /// Backend failure (connection, query, serialization).
    #[error("store backend failure: {0}")]
    Backend(String),
}

impl StoreError {
    /// Create a duplicate error.
    #[must_use]
    pub fn duplicate(entity: &'static str, key: impl Into<String>) -> Self {
        Self::Duplicate {
            entity,
            key: key.into(),
        }
    }

    /// Create a not found error.
    #[must_use]
    pub fn not_found(entity: &'static str, key: impl ToString) -> Self {
        Self::NotFound {
            entity,
            key: key.to_string(),
        }
    }

    /// Create a backend error.
    #[must_use]
    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }

    /// Whether this is a uniqueness violation on `entity`.
    #[must_use]
    pub fn is_duplicate_of(&self, entity: &str) -> bool {
        matches!(self, Self::Duplicate { entity: e, .. } if *e == entity)
    }
}
