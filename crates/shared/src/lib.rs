//! Shared types, errors, and configuration for Cogniflow.
//!
//! This crate provides common types used across all other crates:
//! - Typed IDs for type-safe entity references
//! - Validated currency codes
//! - Application-wide error types
//! - Caller identity (JWT claims and roles)
//! - Configuration management

pub mod auth;
pub mod config;
pub mod error;
pub mod jwt;
pub mod types;

#[cfg(test)]
#[path = "jwt_tests.rs"]
mod jwt_tests;

pub use auth::{Claims, Role};
pub use config::AppConfig;
pub use error::{AppError, AppResult};
