//! Accounts payable/receivable invoice routes.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use cogniflow_core::records::{InvoiceFilter, InvoiceUpdate, NewInvoice};
use cogniflow_shared::types::InvoiceId;
use serde_json::json;

use crate::extract::{JsonBody, PathParam, QueryParams};
use crate::{ApiError, AppState, middleware::AuthUser};

/// Creates the invoice routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/invoices", get(list_invoices).post(create_invoice))
        .route("/invoices/{invoice_id}", get(get_invoice).put(update_invoice))
}

/// GET `/invoices` - Newest issue date first; past-due pending invoices read as overdue.
async fn list_invoices(
    State(state): State<AppState>,
    _auth: AuthUser,
    QueryParams(filter): QueryParams<InvoiceFilter>,
) -> Result<impl IntoResponse, ApiError> {
    let invoices = state.records.list_invoices(&filter).await?;
    Ok(Json(json!({ "invoices": invoices })))
}

/// POST `/invoices` - Record a pending invoice.
async fn create_invoice(
    State(state): State<AppState>,
    auth: AuthUser,
    JsonBody(input): JsonBody<NewInvoice>,
) -> Result<impl IntoResponse, ApiError> {
    auth.require_booker("record invoices")?;

    let invoice = state.records.create_invoice(auth.user_id(), input).await?;
    Ok((StatusCode::CREATED, Json(invoice)))
}

/// GET `/invoices/{invoice_id}`
async fn get_invoice(
    State(state): State<AppState>,
    _auth: AuthUser,
    PathParam(id): PathParam<InvoiceId>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.records.get_invoice(id).await?))
}

/// PUT `/invoices/{invoice_id}` - Partial update. Marking paid posts nothing to the ledger.
async fn update_invoice(
    State(state): State<AppState>,
    auth: AuthUser,
    PathParam(id): PathParam<InvoiceId>,
    JsonBody(update): JsonBody<InvoiceUpdate>,
) -> Result<impl IntoResponse, ApiError> {
    auth.require_booker("update invoices")?;

    let invoice = state.records.update_invoice(auth.user_id(), id, update).await?;
    Ok(Json(invoice))
}

#[cfg(test)]
mod integration_tests {
    use axum::http::{Method, StatusCode};
    use cogniflow_shared::Role;
    use serde_json::json;

    use crate::test_support::{send, test_state, token_for};

    #[tokio::test]
    async fn test_generated_number_and_settlement() {
        let state = test_state();
        let accountant = token_for(&state, Role::Accountant);

        let (status, created) = send(
            &state,
            Method::POST,
            "/api/invoices",
            Some(&accountant),
            Some(json!({
                "clientName": "ABC Construction",
                "amount": "12450",
                "issueDate": "2026-09-15T00:00:00Z",
                "dueDate": "2099-01-15T00:00:00Z",
                "type": "accounts_receivable",
                "notes": "Project phase 1 completion"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["invoiceNumber"], "INV-202609-0001");
        assert_eq!(created["status"], "pending");

        let uri = format!("/api/invoices/{}", created["id"].as_str().unwrap());
        let (status, paid) = send(
            &state,
            Method::PUT,
            &uri,
            Some(&accountant),
            Some(json!({ "status": "paid" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(paid["status"], "paid");

        let (status, body) = send(
            &state,
            Method::PUT,
            &uri,
            Some(&accountant),
            Some(json!({ "status": "pending" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "INVALID_STATUS_TRANSITION");

        let (_, entries) = send(&state, Method::GET, "/api/ledger", Some(&accountant), None).await;
        assert!(entries["entries"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_past_due_pending_reads_overdue() {
        let state = test_state();
        let accountant = token_for(&state, Role::Accountant);

        send(
            &state,
            Method::POST,
            "/api/invoices",
            Some(&accountant),
            Some(json!({
                "invoiceNumber": "PO-2023-142",
                "clientName": "Building Supplies Inc.",
                "amount": "8750",
                "issueDate": "2023-06-01T00:00:00Z",
                "dueDate": "2023-07-01T00:00:00Z",
                "type": "accounts_payable"
            })),
        )
        .await;

        let (status, listed) = send(
            &state,
            Method::GET,
            "/api/invoices?status=overdue",
            Some(&accountant),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let invoices = listed["invoices"].as_array().unwrap();
        assert_eq!(invoices.len(), 1);
        assert_eq!(invoices[0]["status"], "overdue");
    }

    #[tokio::test]
    async fn test_due_before_issue_is_rejected() {
        let state = test_state();
        let admin = token_for(&state, Role::Admin);

        let (status, body) = send(
            &state,
            Method::POST,
            "/api/invoices",
            Some(&admin),
            Some(json!({
                "clientName": "XYZ Development",
                "amount": "100",
                "issueDate": "2026-10-10T00:00:00Z",
                "dueDate": "2026-10-01T00:00:00Z",
                "type": "accounts_receivable"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "DUE_BEFORE_ISSUE");
    }

    #[tokio::test]
    async fn test_blank_number_and_bad_body() {
        let state = test_state();
        let accountant = token_for(&state, Role::Accountant);

        let (status, error) = send(
            &state,
            Method::POST,
            "/api/invoices",
            Some(&accountant),
            Some(json!({
                "invoiceNumber": "",
                "clientName": "ABC Construction",
                "amount": "100",
                "dueDate": "2099-01-15T00:00:00Z",
                "type": "accounts_receivable"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(error["error"], "EMPTY_NUMBER");

        let (status, error) = send(
            &state,
            Method::POST,
            "/api/invoices",
            Some(&accountant),
            Some(json!({ "clientName": "ABC Construction", "amount": "100" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(error["error"], "VALIDATION_ERROR");
    }
}
