//! On-demand insight analysis.

use axum::{Json, Router, extract::State, response::IntoResponse, routing::post};
use chrono::Utc;

use crate::{ApiError, AppState, middleware::AuthUser};

/// Creates the insight routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/insights/analyze", post(run_analysis))
}

/// POST `/insights/analyze` - Run every periodic rule over the current books.
///
/// Insights already raised in the current window are suppressed.
async fn run_analysis(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<impl IntoResponse, ApiError> {
    auth.require_booker("run analysis")?;

    let summary = state
        .insights
        .run_analysis(Some(auth.user_id()), Utc::now())
        .await?;
    Ok(Json(summary))
}
