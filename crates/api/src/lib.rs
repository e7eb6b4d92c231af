//! HTTP API layer with Axum routes and middleware.
//!
//! This crate provides:
//! - REST API routes under `/api`
//! - Bearer-token authentication and role gates
//! - Mapping of domain errors to JSON error responses

pub mod error;
pub mod extract;
pub mod middleware;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use cogniflow_core::dashboard::DashboardService;
use cogniflow_core::insights::{InsightEngine, InsightPolicy, InsightService};
use cogniflow_core::ledger::LedgerService;
use cogniflow_core::records::RecordService;
use cogniflow_core::store::SharedStore;
use cogniflow_shared::config::JwtConfig;
use cogniflow_shared::jwt::JwtService;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use error::ApiError;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Backing store, for reads that need raw snapshots.
    pub store: SharedStore,
    /// Chart of accounts and ledger posting.
    pub ledger: LedgerService,
    /// Transactions and invoices.
    pub records: RecordService,
    /// Insight generation and acknowledgement.
    pub insights: InsightService,
    /// KPI and chart aggregation.
    pub dashboard: DashboardService,
    /// JWT service for token validation.
    pub jwt_service: Arc<JwtService>,
}

impl AppState {
    /// Wires every service over one store.
    #[must_use]
    pub fn new(store: SharedStore, policy: InsightPolicy, jwt: &JwtConfig) -> Self {
        let insights = InsightService::new(store.clone(), InsightEngine::standard(policy));
        Self {
            ledger: LedgerService::new(store.clone()),
            records: RecordService::new(store.clone(), insights.clone()),
            dashboard: DashboardService::new(store.clone()),
            insights,
            store,
            jwt_service: Arc::new(JwtService::new(jwt)),
        }
    }
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api", routes::api_routes_with_state(state.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

#[cfg(test)]
pub(crate) mod test_support;
