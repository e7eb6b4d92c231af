//! General ledger routes.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use cogniflow_core::ledger::{EntryFilter, NewLedgerEntry};
use cogniflow_shared::types::LedgerEntryId;
use serde_json::json;

use crate::extract::{JsonBody, PathParam, QueryParams};
use crate::{ApiError, AppState, middleware::AuthUser};

/// Creates the ledger routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/ledger", get(list_entries).post(post_entry))
        .route("/ledger/{entry_id}", get(get_entry))
}

/// GET `/ledger` - Entries newest first, optionally for one account or transaction.
async fn list_entries(
    State(state): State<AppState>,
    _auth: AuthUser,
    QueryParams(filter): QueryParams<EntryFilter>,
) -> Result<impl IntoResponse, ApiError> {
    let entries = state.ledger.list_entries(&filter).await?;
    Ok(Json(json!({ "entries": entries })))
}

/// POST `/ledger` - Post an entry and apply it to the account balance.
///
/// Responds with the entry and the account as it stands afterwards.
async fn post_entry(
    State(state): State<AppState>,
    auth: AuthUser,
    JsonBody(input): JsonBody<NewLedgerEntry>,
) -> Result<impl IntoResponse, ApiError> {
    auth.require_booker("post ledger entries")?;

    let posted = state.ledger.post_entry(auth.user_id(), input).await?;
    Ok((StatusCode::CREATED, Json(posted)))
}

/// GET `/ledger/{entry_id}`
async fn get_entry(
    State(state): State<AppState>,
    _auth: AuthUser,
    PathParam(id): PathParam<LedgerEntryId>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.ledger.get_entry(id).await?))
}

#[cfg(test)]
mod integration_tests {
    use axum::http::{Method, StatusCode};
    use cogniflow_shared::Role;
    use serde_json::json;

    use crate::test_support::{send, test_state, token_for};

    #[tokio::test]
    async fn test_posting_moves_the_balance() {
        let state = test_state();
        let admin = token_for(&state, Role::Admin);
        let accountant = token_for(&state, Role::Accountant);
        let manager = token_for(&state, Role::Manager);

        send(
            &state,
            Method::POST,
            "/api/accounts",
            Some(&admin),
            Some(json!({ "name": "Cash", "type": "asset", "balance": "1000" })),
        )
        .await;

        let entry = json!({
            "accountName": "Cash",
            "debit": "250",
            "description": "Client deposit",
            "entryNumber": "JE-TEST-0001"
        });

        let (status, _) = send(
            &state,
            Method::POST,
            "/api/ledger",
            Some(&manager),
            Some(entry.clone()),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, posted) = send(
            &state,
            Method::POST,
            "/api/ledger",
            Some(&accountant),
            Some(entry.clone()),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(posted["account"]["balance"], "1250");
        assert_eq!(posted["entry"]["entryNumber"], "JE-TEST-0001");

        let (status, duplicate) =
            send(&state, Method::POST, "/api/ledger", Some(&accountant), Some(entry)).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(duplicate["error"], "DUPLICATE_ENTRY_NUMBER");

        let entry_id = posted["entry"]["id"].as_str().unwrap();
        let (status, fetched) = send(
            &state,
            Method::GET,
            &format!("/api/ledger/{entry_id}"),
            Some(&manager),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched["description"], "Client deposit");
    }

    #[tokio::test]
    async fn test_unknown_account_records_nothing() {
        let state = test_state();
        let accountant = token_for(&state, Role::Accountant);

        let (status, body) = send(
            &state,
            Method::POST,
            "/api/ledger",
            Some(&accountant),
            Some(json!({ "accountName": "Nope", "credit": "10", "description": "Stray" })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "ACCOUNT_NOT_FOUND");

        let (_, listed) = send(&state, Method::GET, "/api/ledger", Some(&accountant), None).await;
        assert!(listed["entries"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_blank_entry_number_and_sub_precision_debit() {
        let state = test_state();
        let admin = token_for(&state, Role::Admin);

        send(
            &state,
            Method::POST,
            "/api/accounts",
            Some(&admin),
            Some(json!({ "name": "Cash", "type": "asset" })),
        )
        .await;

        let (status, error) = send(
            &state,
            Method::POST,
            "/api/ledger",
            Some(&admin),
            Some(json!({
                "accountName": "Cash",
                "debit": "5",
                "description": "Deposit",
                "entryNumber": " "
            })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(error["error"], "EMPTY_ENTRY_NUMBER");

        let (status, error) = send(
            &state,
            Method::POST,
            "/api/ledger",
            Some(&admin),
            Some(json!({ "accountName": "Cash", "debit": "0.00001", "description": "Dust" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(error["error"], "INVALID_AMOUNT");

        let (_, cash) = send(&state, Method::GET, "/api/accounts/Cash", Some(&admin), None).await;
        assert_eq!(cash["balance"], "0");
    }
}
