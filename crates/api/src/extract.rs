//! Request extractors whose rejections use the API error body.
//!
//! axum's own `Json`, `Path` and `Query` reject with plain text and statuses
//! such as 415 or 422; these wrappers answer `400 VALIDATION_ERROR` instead.

use axum::extract::{FromRequest, FromRequestParts};

use crate::ApiError;

/// JSON request body.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct JsonBody<T>(pub T);

/// Path parameters.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct PathParam<T>(pub T);

/// Query string parameters.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct QueryParams<T>(pub T);
