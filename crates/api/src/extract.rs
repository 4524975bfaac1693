//! Request body extractors.

use axum::extract::FromRequest;

use crate::error::AppError;

/// `axum::Json` with rejections reported in the API error format.
///
/// Malformed or mistyped bodies become `400 BAD_REQUEST` with the usual
/// `{ "error", "code" }` body instead of axum's plain-text rejection.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);
