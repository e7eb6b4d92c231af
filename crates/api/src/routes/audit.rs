//! Audit trail routes.

use axum::{
    Json, Router,
    extract::State,
    response::IntoResponse,
    routing::get,
};
use cogniflow_core::audit::AuditFilter;
use serde_json::json;

use crate::extract::QueryParams;
use crate::{ApiError, AppState, middleware::AuthUser};

/// Creates the audit routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/audit-logs", get(list_audit_logs))
}

/// GET `/audit-logs` - Newest first, filtered by entity (admin only).
async fn list_audit_logs(
    State(state): State<AppState>,
    auth: AuthUser,
    QueryParams(filter): QueryParams<AuditFilter>,
) -> Result<impl IntoResponse, ApiError> {
    auth.require_admin("read the audit trail")?;

    let logs = state.store.list_audit_logs(&filter).await?;
    Ok(Json(json!({ "auditLogs": logs })))
}
