//! Repository trait for short link lookups.

use crate::domain::entities::ShortLinkRecord;
use crate::error::AppError;
use async_trait::async_trait;

/// Read-only access to active short links.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgShortLinkRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ShortLinkRepository: Send + Sync {
    /// Finds an active link by code within an owner's namespace.
    ///
    /// `owner_user_id = None` searches unowned platform links only; an owned
    /// link is never returned for a `None` owner and vice versa.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_active(
        &self,
        code: &str,
        owner_user_id: Option<i64>,
    ) -> Result<Option<ShortLinkRecord>, AppError>;
}
