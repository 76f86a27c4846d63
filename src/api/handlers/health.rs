//! Handler for health check endpoint.

use axum::{Json, extract::State, http::StatusCode};

use crate::api::dto::health::{CheckStatus, HealthChecks, HealthResponse};
use crate::state::AppState;

/// Returns service health status with component checks.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response Codes
///
/// - **200 OK**: All components healthy
/// - **503 Service Unavailable**: One or more components degraded
///
/// # Components Checked
///
/// 1. **Database**: Round trip to the tenant store under the lookup timeout
/// 2. **Event Queue**: Checks if the analytics channel is open and reports capacity
/// 3. **Tenant Cache**: Reports entry counts (always ok)
///
/// # Response
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "checks": {
///     "database": { "status": "ok", "message": "Connected" },
///     "event_queue": { "status": "ok", "message": "Capacity: 10000" },
///     "tenant_cache": { "status": "ok", "message": "Entries: 12 subdomain, 3 custom domain" }
///   }
/// }
/// ```
pub async fn health_handler(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    let db_check = match state.tenants.check_store().await {
        Ok(()) => CheckStatus::ok("Connected"),
        Err(e) => CheckStatus::error(format!("Database error: {}", e)),
    };

    let queue_check = check_event_queue(&state);

    let (by_subdomain, by_custom_domain) = state.tenants.cache_sizes();
    let cache_check = CheckStatus::ok(format!(
        "Entries: {} subdomain, {} custom domain",
        by_subdomain, by_custom_domain
    ));

    let all_healthy = db_check.is_ok() && queue_check.is_ok();

    let response = HealthResponse {
        status: if all_healthy { "healthy" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: HealthChecks {
            database: db_check,
            event_queue: queue_check,
            tenant_cache: cache_check,
        },
    };

    if all_healthy {
        Ok(Json(response))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(response)))
    }
}

/// Checks if the analytics queue is operational.
fn check_event_queue(state: &AppState) -> CheckStatus {
    match state.events.capacity() {
        Some(capacity) if !state.events.is_closed() => {
            CheckStatus::ok(format!("Capacity: {}", capacity))
        }
        _ => CheckStatus::error("Event queue is closed"),
    }
}
