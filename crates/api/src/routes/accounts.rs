//! Chart of accounts routes.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use cogniflow_core::ledger::{AccountFilter, AccountUpdate, NewAccount};
use cogniflow_shared::types::AccountId;
use serde_json::json;

use crate::extract::{JsonBody, PathParam, QueryParams};
use crate::{ApiError, AppState, middleware::AuthUser};

/// Creates the account routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/accounts", get(list_accounts).post(create_account))
        .route("/accounts/{account}", get(get_account).put(update_account))
}

/// GET `/accounts` - List accounts by name, optionally filtered by type or active flag.
async fn list_accounts(
    State(state): State<AppState>,
    _auth: AuthUser,
    QueryParams(filter): QueryParams<AccountFilter>,
) -> Result<impl IntoResponse, ApiError> {
    let accounts = state.ledger.list_accounts(&filter).await?;
    Ok(Json(json!({ "accounts": accounts })))
}

/// POST `/accounts` - Create an account (admin only).
async fn create_account(
    State(state): State<AppState>,
    auth: AuthUser,
    JsonBody(input): JsonBody<NewAccount>,
) -> Result<impl IntoResponse, ApiError> {
    auth.require_admin("create accounts")?;

    let account = state.ledger.create_account(auth.user_id(), input).await?;
    tracing::info!(account = %account.name, "Account created");

    Ok((StatusCode::CREATED, Json(account)))
}

/// GET `/accounts/{account}` - Fetch an account by id or, failing that, by name.
async fn get_account(
    State(state): State<AppState>,
    _auth: AuthUser,
    PathParam(key): PathParam<String>,
) -> Result<impl IntoResponse, ApiError> {
    let account = match key.parse::<AccountId>() {
        Ok(id) => state.ledger.get_account_by_id(id).await?,
        Err(_) => state.ledger.get_account(&key).await?,
    };
    Ok(Json(account))
}

/// PUT `/accounts/{account}` - Rename, re-currency or (de)activate an account.
async fn update_account(
    State(state): State<AppState>,
    auth: AuthUser,
    PathParam(id): PathParam<AccountId>,
    JsonBody(update): JsonBody<AccountUpdate>,
) -> Result<impl IntoResponse, ApiError> {
    auth.require_booker("update accounts")?;

    let account = state.ledger.update_account(auth.user_id(), id, update).await?;
    Ok(Json(account))
}

#[cfg(test)]
mod integration_tests {
    use axum::http::{Method, StatusCode};
    use cogniflow_shared::Role;
    use serde_json::json;

    use crate::test_support::{send, test_state, token_for};

    #[tokio::test]
    async fn test_requires_token() {
        let state = test_state();
        let (status, body) = send(&state, Method::GET, "/api/accounts", None, None).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "MISSING_TOKEN");
    }

    #[tokio::test]
    async fn test_rejects_garbage_token() {
        let state = test_state();
        let (status, body) =
            send(&state, Method::GET, "/api/accounts", Some("not-a-jwt"), None).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "INVALID_TOKEN");
    }

    #[tokio::test]
    async fn test_only_admin_creates_accounts() {
        let state = test_state();
        let accountant = token_for(&state, Role::Accountant);
        let admin = token_for(&state, Role::Admin);
        let body = json!({ "name": "Cash", "type": "asset", "balance": "1000.00" });

        let (status, denied) = send(
            &state,
            Method::POST,
            "/api/accounts",
            Some(&accountant),
            Some(body.clone()),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(denied["error"], "FORBIDDEN");

        let (status, created) =
            send(&state, Method::POST, "/api/accounts", Some(&admin), Some(body.clone())).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["name"], "Cash");
        assert_eq!(created["balance"], "1000.00");
        assert_eq!(created["currency"], "USD");

        let (status, conflict) =
            send(&state, Method::POST, "/api/accounts", Some(&admin), Some(body)).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(conflict["error"], "DUPLICATE_ACCOUNT_NAME");
    }

    #[tokio::test]
    async fn test_get_by_name_or_id_and_update() {
        let state = test_state();
        let admin = token_for(&state, Role::Admin);
        let viewer = token_for(&state, Role::User);

        let (_, created) = send(
            &state,
            Method::POST,
            "/api/accounts",
            Some(&admin),
            Some(json!({ "name": "Accounts Receivable", "type": "asset" })),
        )
        .await;
        let id = created["id"].as_str().unwrap().to_string();

        let (status, by_name) = send(
            &state,
            Method::GET,
            "/api/accounts/Accounts%20Receivable",
            Some(&viewer),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(by_name["id"], id.as_str());

        let (status, _) = send(
            &state,
            Method::PUT,
            &format!("/api/accounts/{id}"),
            Some(&viewer),
            Some(json!({ "isActive": false })),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, updated) = send(
            &state,
            Method::PUT,
            &format!("/api/accounts/{id}"),
            Some(&admin),
            Some(json!({ "isActive": false })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["isActive"], false);

        let (_, listed) = send(
            &state,
            Method::GET,
            "/api/accounts?isActive=false",
            Some(&viewer),
            None,
        )
        .await;
        assert_eq!(listed["accounts"].as_array().unwrap().len(), 1);

        let (status, missing) =
            send(&state, Method::GET, "/api/accounts/Petty%20Cash", Some(&viewer), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(missing["error"], "ACCOUNT_NOT_FOUND");
    }
}
