//! Shared application state injected into handlers and the routing layer.

use std::sync::Arc;

use crate::application::services::{RoutingEngine, ShortLinkResolver, TenantResolver};
use crate::domain::analytics_worker::EventSink;

/// Cloneable handle to the long-lived services.
///
/// Built once at startup; every clone shares the same caches and event queue.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<RoutingEngine>,
    pub tenants: Arc<TenantResolver>,
    pub short_links: Arc<ShortLinkResolver>,
    pub events: EventSink,
    /// Read client IP and host from `X-Forwarded-*` headers.
    pub behind_proxy: bool,
    /// `Retry-After` value for 503 responses.
    pub retry_after_secs: u64,
}

impl AppState {
    pub fn new(
        engine: Arc<RoutingEngine>,
        short_links: Arc<ShortLinkResolver>,
        events: EventSink,
        behind_proxy: bool,
        retry_after_secs: u64,
    ) -> Self {
        Self {
            tenants: engine.tenants().clone(),
            engine,
            short_links,
            events,
            behind_proxy,
            retry_after_secs,
        }
    }
}
