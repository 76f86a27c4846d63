//! Default downstream for requests no route claims.

use axum::extract::OriginalUri;
use serde_json::json;

use crate::error::AppError;

/// Answers `404` for anything the downstream application does not serve.
///
/// Used when the router runs standalone; embedding applications supply
/// their own downstream router instead.
pub async fn fallback_handler(OriginalUri(uri): OriginalUri) -> AppError {
    AppError::not_found("Route not found", json!({ "path": uri.path() }))
}
