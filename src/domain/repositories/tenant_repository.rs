//! Repository trait for tenant lookups.

use crate::domain::entities::TenantRecord;
use crate::error::AppError;
use async_trait::async_trait;

/// Read-only access to tenants by their two addressing schemes.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgTenantRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TenantRepository: Send + Sync {
    /// Finds the tenant owning `<subdomain>.<base-domain>`.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(TenantRecord))` if a tenant owns the label
    /// - `Ok(None)` if no tenant does
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_by_subdomain(&self, subdomain: &str) -> Result<Option<TenantRecord>, AppError>;

    /// Finds the tenant owning a DNS-verified custom domain.
    ///
    /// Unverified domains must behave as absent.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_by_custom_domain(&self, host: &str)
    -> Result<Option<TenantRecord>, AppError>;

    /// Checks that the backing store answers at all.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if the store is unreachable.
    async fn ping(&self) -> Result<(), AppError>;
}
