//! Transaction routes.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use cogniflow_core::records::{NewTransaction, TransactionFilter, TransactionUpdate};
use cogniflow_shared::types::TransactionId;
use serde_json::json;

use crate::extract::{JsonBody, PathParam, QueryParams};
use crate::{ApiError, AppState, middleware::AuthUser};

/// Creates the transaction routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/transactions", get(list_transactions).post(create_transaction))
        .route(
            "/transactions/{transaction_id}",
            get(get_transaction).put(update_transaction),
        )
}

/// GET `/transactions` - Newest first, filtered by type, status, category or date range.
async fn list_transactions(
    State(state): State<AppState>,
    _auth: AuthUser,
    QueryParams(filter): QueryParams<TransactionFilter>,
) -> Result<impl IntoResponse, ApiError> {
    let transactions = state.records.list_transactions(&filter).await?;
    Ok(Json(json!({ "transactions": transactions })))
}

/// POST `/transactions` - Record a transaction and screen it for anomalies.
async fn create_transaction(
    State(state): State<AppState>,
    auth: AuthUser,
    JsonBody(input): JsonBody<NewTransaction>,
) -> Result<impl IntoResponse, ApiError> {
    auth.require_booker("record transactions")?;

    let transaction = state.records.create_transaction(auth.user_id(), input).await?;
    Ok((StatusCode::CREATED, Json(transaction)))
}

/// GET `/transactions/{transaction_id}`
async fn get_transaction(
    State(state): State<AppState>,
    _auth: AuthUser,
    PathParam(id): PathParam<TransactionId>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.records.get_transaction(id).await?))
}

/// PUT `/transactions/{transaction_id}` - Partial update; status changes follow the lifecycle.
async fn update_transaction(
    State(state): State<AppState>,
    auth: AuthUser,
    PathParam(id): PathParam<TransactionId>,
    JsonBody(update): JsonBody<TransactionUpdate>,
) -> Result<impl IntoResponse, ApiError> {
    auth.require_booker("update transactions")?;

    let transaction = state
        .records
        .update_transaction(auth.user_id(), id, update)
        .await?;
    Ok(Json(transaction))
}
