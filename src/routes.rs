//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /health`     - Health check: database, event queue, tenant cache
//! - `GET  /r/{code}`   - Scoped short-link redirect
//! - everything else   - the downstream application router
//!
//! # Middleware (outermost first)
//!
//! - **Path normalization** - Trailing slash handling
//! - **Tracing** - Structured request/response logging
//! - **Tenant routing** - Host-based passthrough, rewrite, redirect or rejection

use crate::api::handlers::{fallback_handler, health_handler, short_link_handler};
use crate::api::middleware::{tenant_routing, tracing};
use crate::state::AppState;
use axum::routing::get;
use axum::{Router, middleware};
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Constructs the application with the routing core in front of `downstream`.
///
/// # Arguments
///
/// - `state` - shared application state
/// - `downstream` - the application serving profiles, pages and everything
///   the core passes through; its routes are merged after the core's own
///
/// The tenant routing middleware wraps the merged router from the outside,
/// so a rewritten request is matched against the routes again.
pub fn app_router(state: AppState, downstream: Router) -> NormalizePath<Router> {
    let core = Router::new()
        .route("/health", get(health_handler))
        .route("/r/{code}", get(short_link_handler))
        .with_state(state.clone());

    let routed =
        middleware::from_fn_with_state(state, tenant_routing::layer).layer(core.merge(downstream));

    let router = Router::new()
        .fallback_service(routed)
        .layer(tracing::layer());

    NormalizePathLayer::trim_trailing_slash().layer(router)
}

/// Downstream router used when the service runs standalone.
///
/// Everything that reaches it answers `404`.
pub fn standalone_downstream() -> Router {
    Router::new().fallback(fallback_handler)
}
