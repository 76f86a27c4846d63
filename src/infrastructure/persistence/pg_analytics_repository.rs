//! PostgreSQL implementation of analytics repository.

use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::analytics_event::AnalyticsEvent;
use crate::domain::repositories::AnalyticsRepository;
use crate::error::AppError;

/// PostgreSQL sink for analytics events and click counters.
pub struct PgAnalyticsRepository {
    pool: Arc<PgPool>,
}

impl PgAnalyticsRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AnalyticsRepository for PgAnalyticsRepository {
    async fn record_event(&self, event: AnalyticsEvent) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO analytics_events (
                kind, user_id, link_id, host, path, referrer, referrer_domain,
                device, browser, os, country, region, city, visitor_hash, occurred_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            "#,
        )
        .bind(event.kind.as_str())
        .bind(event.user_id)
        .bind(event.link_id)
        .bind(event.host)
        .bind(event.path)
        .bind(event.referrer)
        .bind(event.referrer_domain)
        .bind(event.device.as_str())
        .bind(event.browser)
        .bind(event.os)
        .bind(event.country)
        .bind(event.region)
        .bind(event.city)
        .bind(event.visitor_hash)
        .bind(event.occurred_at)
        .execute(self.pool.as_ref())
        .await?;

        Ok(())
    }

    async fn increment_click_count(&self, link_id: i64) -> Result<(), AppError> {
        sqlx::query("UPDATE short_links SET click_count = click_count + 1 WHERE id = $1")
            .bind(link_id)
            .execute(self.pool.as_ref())
            .await?;

        Ok(())
    }
}
