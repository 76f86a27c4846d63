//! Repository trait for write-only analytics side effects.

use crate::domain::analytics_event::AnalyticsEvent;
use crate::error::AppError;
use async_trait::async_trait;

/// Sink for analytics rows and click counters.
///
/// Writes are not idempotent; a retried write may double-count.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AnalyticsRepository: Send + Sync {
    /// Persists one analytics event.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn record_event(&self, event: AnalyticsEvent) -> Result<(), AppError>;

    /// Increments a link's click counter by one.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn increment_click_count(&self, link_id: i64) -> Result<(), AppError>;
}
