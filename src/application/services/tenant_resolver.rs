//! Cache-first tenant resolution for subdomains and custom domains.

use std::sync::Arc;
use std::time::Duration;

use metrics::counter;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::domain::entities::TenantRecord;
use crate::domain::repositories::TenantRepository;
use crate::error::ResolveError;
use crate::infrastructure::cache::{CachedLookup, TtlCache};

type TenantCache = TtlCache<String, CachedLookup<TenantRecord>>;

/// Which addressing scheme a lookup goes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupKind {
    Subdomain,
    CustomDomain,
}

impl LookupKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Subdomain => "subdomain",
            Self::CustomDomain => "custom_domain",
        }
    }
}

/// Cache lifetimes and the backing-store timeout.
#[derive(Debug, Clone, Copy)]
pub struct ResolverSettings {
    /// Lifetime of a resolved tenant.
    pub positive_ttl: Duration,
    /// Lifetime of a "not found" tombstone. Shorter than `positive_ttl` so
    /// newly verified domains show up quickly.
    pub negative_ttl: Duration,
    /// Hard limit on a single backing lookup.
    pub lookup_timeout: Duration,
}

impl Default for ResolverSettings {
    fn default() -> Self {
        Self {
            positive_ttl: Duration::from_secs(300),
            negative_ttl: Duration::from_secs(60),
            lookup_timeout: Duration::from_millis(3000),
        }
    }
}

/// Resolves tenants by subdomain or custom domain, cache first.
///
/// # Outcomes
///
/// - Cache hit: the cached tenant, or `NotFound` for a cached tombstone
/// - Store returns a tenant: cached for `positive_ttl`
/// - Store returns nothing: tombstone cached for `negative_ttl`, `NotFound`
/// - Store errors or times out: `Unavailable`, nothing cached, so the next
///   request asks the store again
pub struct TenantResolver {
    repository: Arc<dyn TenantRepository>,
    by_subdomain: Arc<TenantCache>,
    by_custom_domain: Arc<TenantCache>,
    settings: ResolverSettings,
}

impl TenantResolver {
    pub fn new(repository: Arc<dyn TenantRepository>, settings: ResolverSettings) -> Self {
        Self {
            repository,
            by_subdomain: Arc::new(TtlCache::new()),
            by_custom_domain: Arc::new(TtlCache::new()),
            settings,
        }
    }

    /// Resolves the tenant behind `<subdomain>.<base-domain>`.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::NotFound`] if no tenant owns the label and
    /// [`ResolveError::Unavailable`] if the store failed or timed out.
    pub async fn resolve_by_subdomain(&self, subdomain: &str) -> Result<TenantRecord, ResolveError> {
        self.resolve(LookupKind::Subdomain, subdomain).await
    }

    /// Resolves the tenant behind a verified custom domain.
    ///
    /// # Errors
    ///
    /// Same as [`Self::resolve_by_subdomain`].
    pub async fn resolve_by_custom_domain(&self, host: &str) -> Result<TenantRecord, ResolveError> {
        self.resolve(LookupKind::CustomDomain, host).await
    }

    /// Checks the backing store under the lookup timeout, bypassing the caches.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::Unavailable`] if the store failed or timed out.
    pub async fn check_store(&self) -> Result<(), ResolveError> {
        match tokio::time::timeout(self.settings.lookup_timeout, self.repository.ping()).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => Err(ResolveError::Unavailable(e.to_string())),
            Err(_) => Err(ResolveError::Unavailable("ping timed out".to_string())),
        }
    }

    /// Drops a cached entry so the next request re-reads the store.
    pub fn invalidate(&self, kind: LookupKind, key: &str) {
        self.cache(kind).delete(key);
    }

    /// Entry counts of the subdomain and custom-domain caches.
    pub fn cache_sizes(&self) -> (usize, usize) {
        (self.by_subdomain.len(), self.by_custom_domain.len())
    }

    /// Starts the periodic sweep of both caches.
    pub fn spawn_sweepers(&self, interval: Duration) -> [JoinHandle<()>; 2] {
        [
            self.by_subdomain.spawn_sweeper("tenants_by_subdomain", interval),
            self.by_custom_domain
                .spawn_sweeper("tenants_by_custom_domain", interval),
        ]
    }

    fn cache(&self, kind: LookupKind) -> &TenantCache {
        match kind {
            LookupKind::Subdomain => &self.by_subdomain,
            LookupKind::CustomDomain => &self.by_custom_domain,
        }
    }

    async fn resolve(&self, kind: LookupKind, key: &str) -> Result<TenantRecord, ResolveError> {
        let cache = self.cache(kind);

        if let Some(cached) = cache.get(key) {
            counter!("tenant_cache_lookups_total", "kind" => kind.as_str(), "result" => "hit")
                .increment(1);
            return match cached {
                CachedLookup::Found(tenant) => Ok(tenant),
                CachedLookup::Tombstone => Err(ResolveError::NotFound),
            };
        }

        counter!("tenant_cache_lookups_total", "kind" => kind.as_str(), "result" => "miss")
            .increment(1);

        let lookup = async {
            match kind {
                LookupKind::Subdomain => self.repository.find_by_subdomain(key).await,
                LookupKind::CustomDomain => self.repository.find_by_custom_domain(key).await,
            }
        };

        match tokio::time::timeout(self.settings.lookup_timeout, lookup).await {
            Err(_) => {
                warn!(
                    "Tenant lookup by {} '{}' timed out after {:?}",
                    kind.as_str(),
                    key,
                    self.settings.lookup_timeout
                );
                Err(ResolveError::Unavailable("lookup timed out".to_string()))
            }
            Ok(Err(e)) => {
                warn!("Tenant lookup by {} '{}' failed: {}", kind.as_str(), key, e);
                Err(ResolveError::Unavailable(e.to_string()))
            }
            Ok(Ok(None)) => {
                debug!("No tenant for {} '{}'", kind.as_str(), key);
                cache.set(
                    key.to_string(),
                    CachedLookup::Tombstone,
                    self.settings.negative_ttl,
                );
                Err(ResolveError::NotFound)
            }
            Ok(Ok(Some(tenant))) => {
                cache.set(
                    key.to_string(),
                    CachedLookup::Found(tenant.clone()),
                    self.settings.positive_ttl,
                );
                Ok(tenant)
            }
        }
    }
}
