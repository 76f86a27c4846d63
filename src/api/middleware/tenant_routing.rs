//! Host-aware request routing middleware.

use axum::{
    extract::{Request, State},
    http::Uri,
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::error;

use crate::api::response::found_no_store;
use crate::application::services::RoutingRequest;
use crate::domain::decision::RoutingDecision;
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::request_meta::{request_host, visitor_info};

/// Applies the routing decision for every inbound request.
///
/// Must wrap the [`axum::Router`] from the outside so that rewritten URIs
/// are routed again:
///
/// ```rust,ignore
/// let routed = middleware::from_fn_with_state(state, tenant_routing::layer).layer(router);
/// ```
///
/// # Outcomes
///
/// - **Passthrough**: request forwarded unchanged
/// - **Rewrite**: URI replaced with the internal path plus scope query;
///   the pre-rewrite URI stays available as [`axum::extract::OriginalUri`]
///   when an outer router set it
/// - **Redirect**: `302 Found` with no-store headers
/// - **NotFound**: `404` JSON error, no-store
/// - **ServiceUnavailable**: `503` JSON error with `Retry-After`, no-store
pub async fn layer(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    let host = request_host(req.headers(), state.behind_proxy)
        .or_else(|| req.uri().host())
        .map(str::to_string);
    let visitor = visitor_info(req.headers(), req.extensions(), state.behind_proxy);
    let path = req.uri().path().to_string();

    let decision = state
        .engine
        .decide(&RoutingRequest {
            host: host.as_deref(),
            path: &path,
            visitor: &visitor,
        })
        .await;

    match decision {
        RoutingDecision::Passthrough => next.run(req).await,
        RoutingDecision::Rewrite(rewrite) => {
            let target = rewrite.path_and_query(req.uri().query());

            match target.parse::<Uri>() {
                Ok(uri) => {
                    *req.uri_mut() = uri;
                    next.run(req).await
                }
                Err(e) => {
                    error!("Invalid rewrite target '{}': {}", target, e);
                    AppError::internal("Invalid rewrite target", json!({})).into_response()
                }
            }
        }
        RoutingDecision::Redirect { location } => found_no_store(&location),
        RoutingDecision::NotFound => {
            AppError::not_found("Not found", json!({ "host": host })).into_response()
        }
        RoutingDecision::ServiceUnavailable { retry_after_secs } => AppError::unavailable(
            "Service temporarily unavailable",
            json!({}),
            retry_after_secs,
        )
        .into_response(),
    }
}
