//! HS256 access tokens.
//!
//! The API only verifies tokens. `issue` exists for operator tooling and
//! tests that need a bearer token for a given role.

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use thiserror::Error;

use crate::auth::{Claims, Role, TOKEN_ISSUER};
use crate::config::JwtConfig;
use crate::types::UserId;

/// Why a token could not be issued or accepted.
#[derive(Debug, Error)]
pub enum JwtError {
    /// Signing failed.
    #[error("failed to sign token: {0}")]
    Sign(String),

    /// Bad signature, wrong issuer or malformed payload.
    #[error("token rejected: {0}")]
    Rejected(String),

    /// `exp` is in the past.
    #[error("token has expired")]
    Expired,
}

/// Signs and verifies bearer tokens with a shared secret.
#[derive(Clone)]
pub struct JwtService {
    ttl: Duration,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("ttl", &self.ttl)
            .field("keys", &"[hidden]")
            .finish_non_exhaustive()
    }
}

impl JwtService {
    /// Builds the service from the `[jwt]` config section.
    #[must_use]
    pub fn new(config: &JwtConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[TOKEN_ISSUER]);
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);

        Self {
            ttl: Duration::seconds(i64::try_from(config.access_token_expiry_secs).unwrap_or(i64::MAX)),
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
        }
    }

    /// Signs a token for `user` acting as `role`, valid for the configured lifetime.
    ///
    /// # Errors
    ///
    /// `JwtError::Sign` if encoding fails.
    pub fn issue(&self, user: UserId, role: Role) -> Result<String, JwtError> {
        let claims = Claims::new(user, role, Utc::now(), self.ttl);
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| JwtError::Sign(e.to_string()))
    }

    /// Verifies signature, issuer and expiry, returning the caller's claims.
    ///
    /// # Errors
    ///
    /// `JwtError::Expired` for stale tokens, `JwtError::Rejected` for anything else.
    pub fn verify(&self, token: &str) -> Result<Claims, JwtError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => JwtError::Expired,
                _ => JwtError::Rejected(e.to_string()),
            })
    }

    /// Configured token lifetime.
    #[must_use]
    pub const fn ttl(&self) -> Duration {
        self.ttl
    }
}
