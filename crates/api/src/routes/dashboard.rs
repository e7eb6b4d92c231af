//! Dashboard routes: KPI cards, chart series and the insight feed.

use axum::{
    Json, Router,
    extract::State,
    response::IntoResponse,
    routing::{get, put},
};
use chrono::Utc;
use cogniflow_core::insights::InsightFilter;
use cogniflow_shared::types::InsightId;
use serde_json::json;

use crate::extract::{PathParam, QueryParams};
use crate::{ApiError, AppState, middleware::AuthUser};

/// Creates the dashboard routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard/kpis", get(kpis))
        .route("/dashboard/charts", get(charts))
        .route("/dashboard/chart/revenue", get(revenue_chart))
        .route("/dashboard/chart/expenses", get(expense_chart))
        .route("/dashboard/insights", get(list_insights))
        .route("/dashboard/insights/{insight_id}/read", put(mark_insight_read))
}

/// GET `/dashboard/kpis`
async fn kpis(State(state): State<AppState>, _auth: AuthUser) -> Result<impl IntoResponse, ApiError> {
    let kpis = state.dashboard.kpis(Utc::now().date_naive()).await?;
    Ok(Json(kpis))
}

/// GET `/dashboard/charts` - Monthly series plus the expense breakdown.
async fn charts(State(state): State<AppState>, _auth: AuthUser) -> Result<impl IntoResponse, ApiError> {
    let charts = state.dashboard.charts(Utc::now().date_naive()).await?;
    Ok(Json(charts))
}

/// GET `/dashboard/chart/revenue` - Trailing six months of revenue and expenses.
async fn revenue_chart(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> Result<impl IntoResponse, ApiError> {
    let charts = state.dashboard.charts(Utc::now().date_naive()).await?;
    Ok(Json(charts.monthly))
}

/// GET `/dashboard/chart/expenses` - Expense share per category.
async fn expense_chart(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> Result<impl IntoResponse, ApiError> {
    let charts = state.dashboard.charts(Utc::now().date_naive()).await?;
    Ok(Json(json!({ "categories": charts.expense_categories })))
}

/// GET `/dashboard/insights` - Newest first, filtered by type or read flag.
async fn list_insights(
    State(state): State<AppState>,
    _auth: AuthUser,
    QueryParams(filter): QueryParams<InsightFilter>,
) -> Result<impl IntoResponse, ApiError> {
    let insights = state.insights.list(&filter).await?;
    Ok(Json(json!({ "insights": insights })))
}

/// PUT `/dashboard/insights/{insight_id}/read`
async fn mark_insight_read(
    State(state): State<AppState>,
    auth: AuthUser,
    PathParam(id): PathParam<InsightId>,
) -> Result<impl IntoResponse, ApiError> {
    let insight = state.insights.mark_read(auth.user_id(), id).await?;
    Ok(Json(insight))
}
