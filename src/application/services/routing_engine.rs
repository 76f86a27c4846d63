//! Per-request routing state machine.
//!
//! Combines host classification, path segmentation and tenant resolution into
//! a single [`RoutingDecision`]:
//!
//! 1. Reserved first segment or static asset: passthrough, no lookup
//! 2. Missing or unparseable host: passthrough
//! 3. Main domain: passthrough
//! 4. Tenant subdomain or custom domain: resolve the tenant, then route by path
//!
//! Store failures while resolving a tenant always become
//! [`RoutingDecision::ServiceUnavailable`], never a passthrough.

use std::sync::Arc;

use metrics::counter;
use tracing::{debug, warn};

use crate::application::services::TenantResolver;
use crate::domain::analytics_event::{AnalyticsEvent, EventKind};
use crate::domain::analytics_worker::EventSink;
use crate::domain::decision::{Rewrite, RoutingDecision};
use crate::domain::entities::{LinkScope, TenantRecord, VisitorInfo};
use crate::domain::host::{HostClass, HostClassifier, normalize_host};
use crate::domain::path::{PathSegments, ReservedRoutes, SHORT_LINK_SEGMENT};
use crate::error::ResolveError;
use crate::utils::redirect_target::validate_redirect_target;

const BIO_SEGMENT: &str = "bio";
const PAGE_SEGMENT: &str = "page";

/// The parts of a request the engine looks at.
#[derive(Debug, Clone, Copy)]
pub struct RoutingRequest<'a> {
    /// Effective host, if any (`Host` or a trusted `X-Forwarded-Host`).
    pub host: Option<&'a str>,
    /// Request path without the query string.
    pub path: &'a str,
    pub visitor: &'a VisitorInfo,
}

/// Shape of a path on a tenant-addressed host.
#[derive(Debug, PartialEq, Eq)]
enum TenantPath<'a> {
    Root,
    Bio,
    Page,
    ShortCode(&'a str),
    Other,
}

impl<'a> TenantPath<'a> {
    fn from_segments(segments: &PathSegments<'a>) -> Self {
        match segments.as_slice() {
            [] => Self::Root,
            [BIO_SEGMENT] => Self::Bio,
            [PAGE_SEGMENT, _] => Self::Page,
            [code] => Self::ShortCode(*code),
            _ => Self::Other,
        }
    }
}

pub struct RoutingEngine {
    classifier: HostClassifier,
    reserved: ReservedRoutes,
    tenants: Arc<TenantResolver>,
    events: EventSink,
    retry_after_secs: u64,
}

impl RoutingEngine {
    pub fn new(
        classifier: HostClassifier,
        tenants: Arc<TenantResolver>,
        events: EventSink,
        retry_after_secs: u64,
    ) -> Self {
        Self {
            classifier,
            reserved: ReservedRoutes::default(),
            tenants,
            events,
            retry_after_secs,
        }
    }

    pub fn classifier(&self) -> &HostClassifier {
        &self.classifier
    }

    pub fn tenants(&self) -> &Arc<TenantResolver> {
        &self.tenants
    }

    /// Decides how to serve a request.
    ///
    /// Never fails: every resolution error is folded into the decision.
    pub async fn decide(&self, request: &RoutingRequest<'_>) -> RoutingDecision {
        let decision = self.route(request).await;

        debug!(
            "Routing {:?}{} -> {}",
            request.host,
            request.path,
            decision.label()
        );
        counter!("routing_decisions_total", "decision" => decision.label()).increment(1);

        decision
    }

    async fn route(&self, request: &RoutingRequest<'_>) -> RoutingDecision {
        let segments = PathSegments::parse(request.path);

        if self.reserved.is_passthrough(&segments) {
            return RoutingDecision::Passthrough;
        }

        let Some(host) = request.host.and_then(normalize_host) else {
            return RoutingDecision::Passthrough;
        };

        match self.classifier.classify(&host) {
            HostClass::Main => RoutingDecision::Passthrough,
            HostClass::Subdomain(label) => {
                match self.tenants.resolve_by_subdomain(&label).await {
                    Ok(tenant) => self.route_subdomain(&tenant, label, &segments),
                    Err(e) => self.resolution_failed(e),
                }
            }
            HostClass::Custom(domain) => {
                match self.tenants.resolve_by_custom_domain(&domain).await {
                    Ok(tenant) => self.route_custom_domain(&tenant, domain, &segments, request),
                    Err(e) => self.resolution_failed(e),
                }
            }
        }
    }

    fn route_subdomain(
        &self,
        tenant: &TenantRecord,
        label: String,
        segments: &PathSegments<'_>,
    ) -> RoutingDecision {
        let scope = LinkScope::Subdomain(label);

        match TenantPath::from_segments(segments) {
            TenantPath::Root | TenantPath::Bio => profile_rewrite(tenant, scope),
            TenantPath::ShortCode(code) => short_link_rewrite(code, scope),
            TenantPath::Page | TenantPath::Other => RoutingDecision::Passthrough,
        }
    }

    fn route_custom_domain(
        &self,
        tenant: &TenantRecord,
        domain: String,
        segments: &PathSegments<'_>,
        request: &RoutingRequest<'_>,
    ) -> RoutingDecision {
        match TenantPath::from_segments(segments) {
            TenantPath::Root => {
                if let Some(location) = self.root_redirect(tenant) {
                    self.events.record(AnalyticsEvent::new(
                        EventKind::RootRedirect,
                        Some(tenant.user_id),
                        Some(&domain),
                        request.path,
                        request.visitor,
                    ));
                    return RoutingDecision::Redirect { location };
                }
                profile_rewrite(tenant, LinkScope::CustomDomain(domain))
            }
            TenantPath::Bio => profile_rewrite(tenant, LinkScope::CustomDomain(domain)),
            TenantPath::ShortCode(code) => short_link_rewrite(code, LinkScope::CustomDomain(domain)),
            TenantPath::Page | TenantPath::Other => RoutingDecision::Passthrough,
        }
    }

    /// Redirect target for a custom domain root, if redirect mode applies.
    fn root_redirect(&self, tenant: &TenantRecord) -> Option<String> {
        let target = tenant.root_redirect_target()?;

        match validate_redirect_target(target) {
            Ok(location) => Some(location.to_string()),
            Err(e) => {
                warn!(
                    "Tenant {} has an unusable root redirect '{}': {}; serving profile",
                    tenant.user_id, target, e
                );
                None
            }
        }
    }

    fn resolution_failed(&self, error: ResolveError) -> RoutingDecision {
        match error {
            ResolveError::NotFound => RoutingDecision::NotFound,
            ResolveError::Unavailable(_) => RoutingDecision::ServiceUnavailable {
                retry_after_secs: self.retry_after_secs,
            },
        }
    }
}

fn profile_rewrite(tenant: &TenantRecord, scope: LinkScope) -> RoutingDecision {
    RoutingDecision::Rewrite(Rewrite::to_segments(&[tenant.username.as_str()], scope))
}

/// Request segments arrive percent-encoded and the rewrite encodes again, so
/// the code is decoded first. Codes that are not valid UTF-8 cannot exist.
fn short_link_rewrite(code: &str, scope: LinkScope) -> RoutingDecision {
    match urlencoding::decode(code) {
        Ok(code) => {
            RoutingDecision::Rewrite(Rewrite::to_segments(&[SHORT_LINK_SEGMENT, &code], scope))
        }
        Err(_) => RoutingDecision::NotFound,
    }
}
