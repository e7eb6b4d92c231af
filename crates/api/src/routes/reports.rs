//! Financial report routes.

use axum::{
    Json, Router,
    extract::State,
    response::IntoResponse,
    routing::get,
};
use chrono::{NaiveDate, Utc};
use cogniflow_core::calendar;
use cogniflow_core::ledger::{Account, AccountFilter};
use cogniflow_core::records::{Transaction, TransactionFilter};
use cogniflow_core::reports::ReportService;
use serde::Deserialize;

use crate::extract::QueryParams;
use crate::{ApiError, AppState, middleware::AuthUser};

/// Months covered by a cash-flow report when no start date is given.
const DEFAULT_CASH_FLOW_MONTHS: u32 = 6;

/// Creates the report routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/reports/cash-flow", get(cash_flow))
        .route("/reports/income-statement", get(income_statement))
        .route("/reports/balance-sheet", get(balance_sheet))
        .route("/reports/trial-balance", get(trial_balance))
}

/// Query parameters for the cash-flow report.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CashFlowQuery {
    /// First day included (YYYY-MM-DD).
    pub start_date: Option<NaiveDate>,
    /// Last day included (YYYY-MM-DD), today when omitted.
    pub end_date: Option<NaiveDate>,
}

async fn accounts(state: &AppState) -> Result<Vec<Account>, ApiError> {
    Ok(state.ledger.list_accounts(&AccountFilter::default()).await?)
}

async fn transactions(state: &AppState) -> Result<Vec<Transaction>, ApiError> {
    Ok(state
        .records
        .list_transactions(&TransactionFilter::default())
        .await?)
}

/// GET `/reports/cash-flow` - Inflow, outflow and a monthly series for a date range.
async fn cash_flow(
    State(state): State<AppState>,
    _auth: AuthUser,
    QueryParams(query): QueryParams<CashFlowQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let end = query.end_date.unwrap_or_else(|| Utc::now().date_naive());
    let start = query
        .start_date
        .unwrap_or_else(|| calendar::months_back(end, DEFAULT_CASH_FLOW_MONTHS));

    let report = ReportService::cash_flow(&transactions(&state).await?, start, end)?;
    Ok(Json(report))
}

/// GET `/reports/income-statement`
async fn income_statement(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> Result<impl IntoResponse, ApiError> {
    let accounts = accounts(&state).await?;
    let transactions = transactions(&state).await?;
    Ok(Json(ReportService::income_statement(&accounts, &transactions)))
}

/// GET `/reports/balance-sheet`
///
/// Unbalanced books still produce a report; they additionally leave a
/// warning insight on the dashboard.
async fn balance_sheet(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> Result<impl IntoResponse, ApiError> {
    let accounts = accounts(&state).await?;
    let sheet = ReportService::balance_sheet(&accounts);

    if !sheet.is_balanced
        && let Err(e) = state.insights.flag_unbalanced_books(&accounts, Utc::now()).await
    {
        tracing::warn!(error = %e, "Failed to record balance sheet warning");
    }

    Ok(Json(sheet))
}

/// GET `/reports/trial-balance`
async fn trial_balance(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(ReportService::trial_balance(&accounts(&state).await?)))
}

#[cfg(test)]
mod integration_tests {
    use axum::http::{Method, StatusCode};
    use cogniflow_shared::Role;
    use serde_json::json;

    use crate::AppState;
    use crate::test_support::{send, test_state, token_for};

    async fn post(state: &AppState, token: &str, uri: &str, body: serde_json::Value) {
        let (status, _) = send(state, Method::POST, uri, Some(token), Some(body)).await;
        assert_eq!(status, StatusCode::CREATED);
    }

    #[tokio::test]
    async fn test_cash_flow_range() {
        let state = test_state();
        let accountant = token_for(&state, Role::Accountant);

        for (number, amount, kind, date) in [
            ("TX-1", "1000", "income", "2026-03-05T09:00:00Z"),
            ("TX-2", "400", "expense", "2026-04-20T09:00:00Z"),
            ("TX-3", "999", "income", "2026-06-01T09:00:00Z"),
        ] {
            post(
                &state,
                &accountant,
                "/api/transactions",
                json!({
                    "transactionNumber": number,
                    "description": "Report fixture",
                    "amount": amount,
                    "type": kind,
                    "category": "General",
                    "status": "completed",
                    "date": date
                }),
            )
            .await;
        }

        let (status, report) = send(
            &state,
            Method::GET,
            "/api/reports/cash-flow?startDate=2026-03-01&endDate=2026-05-31",
            Some(&accountant),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(report["inflow"], "1000");
        assert_eq!(report["outflow"], "400");
        assert_eq!(report["net"], "600");
        assert_eq!(report["series"].as_array().unwrap().len(), 3);

        let (status, body) = send(
            &state,
            Method::GET,
            "/api/reports/cash-flow?startDate=2026-06-01&endDate=2026-05-01",
            Some(&accountant),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "INVALID_DATE_RANGE");
    }

    #[tokio::test]
    async fn test_unbalanced_sheet_leaves_one_warning() {
        let state = test_state();
        let admin = token_for(&state, Role::Admin);

        post(
            &state,
            &admin,
            "/api/accounts",
            json!({ "name": "Cash", "type": "asset", "balance": "500" }),
        )
        .await;

        for _ in 0..2 {
            let (status, sheet) =
                send(&state, Method::GET, "/api/reports/balance-sheet", Some(&admin), None).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(sheet["isBalanced"], false);
        }

        let (_, insights) =
            send(&state, Method::GET, "/api/dashboard/insights", Some(&admin), None).await;
        let insights = insights["insights"].as_array().unwrap();
        assert_eq!(insights.len(), 1);
        assert_eq!(insights[0]["severity"], "warning");
    }

    #[tokio::test]
    async fn test_statements_over_balanced_books() {
        let state = test_state();
        let admin = token_for(&state, Role::Admin);

        for (name, kind, balance) in [
            ("Cash", "asset", "1500"),
            ("Loan", "liability", "1000"),
            ("Capital", "equity", "500"),
            ("Revenue", "revenue", "2000"),
            ("Expenses", "expense", "800"),
        ] {
            post(
                &state,
                &admin,
                "/api/accounts",
                json!({ "name": name, "type": kind, "balance": balance }),
            )
            .await;
        }

        let (_, statement) =
            send(&state, Method::GET, "/api/reports/income-statement", Some(&admin), None).await;
        assert_eq!(statement["netIncome"], "1200");

        let (_, sheet) =
            send(&state, Method::GET, "/api/reports/balance-sheet", Some(&admin), None).await;
        assert_eq!(sheet["isBalanced"], true);

        let (status, trial) =
            send(&state, Method::GET, "/api/reports/trial-balance", Some(&admin), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(trial["totalDebit"], "2300");
        assert_eq!(trial["totalCredit"], "3500");

        let (_, insights) =
            send(&state, Method::GET, "/api/dashboard/insights", Some(&admin), None).await;
        assert!(insights["insights"].as_array().unwrap().is_empty());
    }
}
