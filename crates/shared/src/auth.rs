//! Caller identity carried in access tokens.
//!
//! Token issuance (login, registration, password storage) lives outside this
//! service; the ledger only needs to know who is acting and in what role.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::types::UserId;

/// Role of the authenticated user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Full access, including chart-of-accounts and audit trail.
    Admin,
    /// Books entries, transactions and invoices.
    Accountant,
    /// Read-only management access.
    Manager,
    /// Read-only access.
    User,
}

impl Role {
    /// May create accounts and read the audit trail.
    #[must_use]
    pub const fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }

    /// May post ledger entries, record transactions/invoices, update accounts
    /// and trigger analysis runs.
    #[must_use]
    pub const fn can_book(self) -> bool {
        matches!(self, Self::Admin | Self::Accountant)
    }

    /// Lowercase name as it appears in tokens.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Accountant => "accountant",
            Self::Manager => "manager",
            Self::User => "user",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `iss` value written into and required from every token.
pub const TOKEN_ISSUER: &str = "cogniflow";

/// Claims carried by a Cogniflow access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Acting user.
    pub sub: UserId,
    /// Role that gates bookkeeping and admin routes.
    pub role: Role,
    /// Always [`TOKEN_ISSUER`].
    pub iss: String,
    /// Issued at, unix seconds.
    pub iat: i64,
    /// Expiry, unix seconds.
    pub exp: i64,
}

impl Claims {
    /// Claims for `user` issued at `issued_at` and valid for `ttl`.
    #[must_use]
    pub fn new(user: UserId, role: Role, issued_at: DateTime<Utc>, ttl: Duration) -> Self {
        Self {
            sub: user,
            role,
            iss: TOKEN_ISSUER.to_string(),
            iat: issued_at.timestamp(),
            exp: (issued_at + ttl).timestamp(),
        }
    }
}
