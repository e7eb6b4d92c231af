//! API route definitions.

use axum::{Router, middleware};

use crate::{AppState, middleware::auth_middleware};

pub mod accounts;
pub mod audit;
pub mod dashboard;
pub mod health;
pub mod insights;
pub mod invoices;
pub mod ledger;
pub mod reports;
pub mod transactions;

/// Creates the API router: public health check plus token-protected routes.
#[allow(clippy::needless_pass_by_value)]
pub fn api_routes_with_state(state: AppState) -> Router<AppState> {
    let protected_routes = Router::new()
        .merge(accounts::routes())
        .merge(ledger::routes())
        .merge(transactions::routes())
        .merge(invoices::routes())
        .merge(reports::routes())
        .merge(dashboard::routes())
        .merge(insights::routes())
        .merge(audit::routes())
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new().merge(health::routes()).merge(protected_routes)
}
