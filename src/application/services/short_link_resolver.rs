//! Scoped short-link resolution with fire-and-forget click tracking.

use std::sync::Arc;
use std::time::Duration;

use metrics::counter;
use tracing::{debug, warn};

use crate::application::services::TenantResolver;
use crate::domain::analytics_event::{AnalyticsEvent, EventKind};
use crate::domain::analytics_worker::EventSink;
use crate::domain::entities::{LinkScope, ShortLinkRecord, VisitorInfo};
use crate::domain::repositories::ShortLinkRepository;
use crate::error::ResolveError;
use crate::utils::redirect_target::validate_redirect_target;

/// Resolves short codes within a tenant scope or the global namespace.
///
/// Tenants share the code namespace only with themselves: the same code under
/// two tenants names two different links, and an owned link is never visible
/// through the global scope.
pub struct ShortLinkResolver {
    links: Arc<dyn ShortLinkRepository>,
    tenants: Arc<TenantResolver>,
    events: EventSink,
    lookup_timeout: Duration,
}

impl ShortLinkResolver {
    pub fn new(
        links: Arc<dyn ShortLinkRepository>,
        tenants: Arc<TenantResolver>,
        events: EventSink,
        lookup_timeout: Duration,
    ) -> Self {
        Self {
            links,
            tenants,
            events,
            lookup_timeout,
        }
    }

    /// Looks up an active link without recording anything.
    ///
    /// # Errors
    ///
    /// - [`ResolveError::NotFound`] if the scope's tenant or the code is
    ///   unknown, the link is inactive, or its destination is not a valid
    ///   `http`/`https` URL
    /// - [`ResolveError::Unavailable`] if a backing lookup failed or timed out
    pub async fn lookup(&self, code: &str, scope: &LinkScope) -> Result<ShortLinkRecord, ResolveError> {
        let owner_user_id = match scope {
            LinkScope::Subdomain(label) => Some(self.tenants.resolve_by_subdomain(label).await?.user_id),
            LinkScope::CustomDomain(host) => {
                Some(self.tenants.resolve_by_custom_domain(host).await?.user_id)
            }
            LinkScope::Global => None,
        };

        let link = match tokio::time::timeout(
            self.lookup_timeout,
            self.links.find_active(code, owner_user_id),
        )
        .await
        {
            Err(_) => {
                warn!(
                    "Short link lookup '{}' timed out after {:?}",
                    code, self.lookup_timeout
                );
                return Err(ResolveError::Unavailable("lookup timed out".to_string()));
            }
            Ok(Err(e)) => {
                warn!("Short link lookup '{}' failed: {}", code, e);
                return Err(ResolveError::Unavailable(e.to_string()));
            }
            Ok(Ok(None)) => return Err(ResolveError::NotFound),
            Ok(Ok(Some(link))) => link,
        };

        if !link.is_active || link.owner_user_id != owner_user_id {
            debug!("Short link '{}' is inactive or outside {:?}", code, scope);
            return Err(ResolveError::NotFound);
        }

        if let Err(e) = validate_redirect_target(&link.destination_url) {
            warn!(
                "Short link {} has an unusable destination '{}': {}",
                link.id, link.destination_url, e
            );
            return Err(ResolveError::NotFound);
        }

        Ok(link)
    }

    /// Resolves a link for a visitor and queues its click tracking.
    ///
    /// The analytics event and the click counter increment are queued, never
    /// awaited; a full queue drops them without affecting the result.
    ///
    /// # Errors
    ///
    /// Same as [`Self::lookup`].
    pub async fn resolve(
        &self,
        code: &str,
        scope: &LinkScope,
        host: Option<&str>,
        visitor: &VisitorInfo,
    ) -> Result<ShortLinkRecord, ResolveError> {
        let result = self.lookup(code, scope).await;

        let label = match &result {
            Ok(_) => "found",
            Err(ResolveError::NotFound) => "not_found",
            Err(ResolveError::Unavailable(_)) => "unavailable",
        };
        counter!("short_link_resolutions_total", "result" => label).increment(1);

        let link = result?;

        let path = format!("/{}", code);
        self.events.record(
            AnalyticsEvent::new(EventKind::LinkClick, link.owner_user_id, host, &path, visitor)
                .with_link(link.id),
        );
        self.events.increment_clicks(link.id);

        Ok(link)
    }
}
