//! Router harness for route tests.

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use cogniflow_core::insights::InsightPolicy;
use cogniflow_core::store::MemoryStore;
use cogniflow_shared::Role;
use cogniflow_shared::config::JwtConfig;
use cogniflow_shared::types::UserId;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use crate::{AppState, create_router};

pub fn test_state() -> AppState {
    let jwt = JwtConfig {
        secret: "test-secret-key-that-is-long-enough".to_string(),
        access_token_expiry_secs: 900,
    };
    AppState::new(Arc::new(MemoryStore::new()), InsightPolicy::default(), &jwt)
}

pub fn token_for(state: &AppState, role: Role) -> String {
    state
        .jwt_service
        .issue(UserId::new(), role)
        .unwrap()
}

/// Sends one request through the full router and decodes the JSON body.
pub async fn send(
    state: &AppState,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let app: Router = create_router(state.clone());

    let mut request = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        request = request.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => request
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => request.body(Body::empty()).unwrap(),
    };

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}
