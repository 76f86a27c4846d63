//! Handler for scoped short-link resolution.

use axum::{
    extract::{Path, Query, Request, State},
    response::Response,
};
use serde_json::json;
use tracing::debug;

use crate::api::dto::short_link::ScopeParams;
use crate::api::response::found_no_store;
use crate::domain::host::normalize_host;
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::request_meta::{request_host, visitor_info};

/// Longest short code accepted; anything longer cannot exist.
const MAX_CODE_LEN: usize = 64;

/// Redirects a short code to its destination.
///
/// # Endpoint
///
/// `GET /r/{code}?subdomain=<label>` or `GET /r/{code}?domain=<host>`
///
/// Tenant hosts reach this endpoint through the routing middleware, which
/// rewrites `/{code}` and sets the scope. On a tenant host the scope always
/// comes from the host; a query naming another tenant is a 404. On the main
/// domain the query scope is used, and without one only platform-level links
/// match.
///
/// # Click Tracking
///
/// The analytics event and click counter increment are queued for the
/// background worker and never delay the redirect.
///
/// # Responses
///
/// - **302 Found** with no-store headers on success
/// - **404 Not Found** for unknown, inactive or out-of-scope codes
/// - **503 Service Unavailable** with `Retry-After` if a lookup failed
pub async fn short_link_handler(
    Path(code): Path<String>,
    Query(params): Query<ScopeParams>,
    State(state): State<AppState>,
    request: Request,
) -> Result<Response, AppError> {
    if code.is_empty() || code.len() > MAX_CODE_LEN {
        return Err(AppError::not_found("Not found", json!({ "code": code })));
    }

    let host = request_host(request.headers(), state.behind_proxy)
        .or_else(|| request.uri().host())
        .and_then(normalize_host);
    let host_scope = host
        .as_deref()
        .and_then(|h| state.engine.classifier().classify(h).link_scope());

    let Some(scope) = params.effective_scope(host_scope) else {
        debug!("Scope mismatch for '{}' on {:?}", code, host);
        return Err(AppError::not_found("Not found", json!({ "code": code })));
    };

    let visitor = visitor_info(request.headers(), request.extensions(), state.behind_proxy);

    let link = state
        .short_links
        .resolve(&code, &scope, host.as_deref(), &visitor)
        .await
        .map_err(|e| AppError::from_resolve(e, state.retry_after_secs, json!({ "code": code })))?;

    Ok(found_no_store(&link.destination_url))
}
