//! Typed IDs for type-safe entity references.
//!
//! Using typed IDs prevents accidentally passing an `InvoiceId` where a `TransactionId` is expected.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// A string that is not a UUID, tagged with the entity it was meant for.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {kind} id '{value}'")]
pub struct InvalidId {
    /// Entity kind, e.g. `account`.
    pub kind: &'static str,
    /// The rejected input.
    pub value: String,
}

macro_rules! typed_id {
    ($name:ident, $kind:literal) => {
        #[doc = concat!("Identifier of a stored ", $kind, " (UUID v7).")]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Entity kind used in error messages.
            pub const KIND: &'static str = $kind;

            /// Creates a new random ID using UUID v7 (time-ordered).
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// Creates an ID from an existing UUID.
            #[must_use]
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Returns the inner UUID.
            #[must_use]
            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<$name> for Uuid {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl std::str::FromStr for $name {
            type Err = InvalidId;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s.trim()).map(Self).map_err(|_| InvalidId {
                    kind: $kind,
                    value: s.to_string(),
                })
            }
        }
    };
}

typed_id!(UserId, "user");
typed_id!(AccountId, "account");
typed_id!(LedgerEntryId, "ledger entry");
typed_id!(TransactionId, "transaction");
typed_id!(InvoiceId, "invoice");
typed_id!(InsightId, "insight");
typed_id!(AuditLogId, "audit log");

#[cfg(test)]
#[path = "id_tests.rs"]
mod tests;
