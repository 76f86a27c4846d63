//! PostgreSQL implementation of tenant repository.

use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;
use tracing::warn;

use crate::domain::entities::{RootDomainMode, TenantRecord};
use crate::domain::repositories::TenantRepository;
use crate::error::AppError;

#[derive(sqlx::FromRow)]
struct TenantRow {
    id: i64,
    username: String,
    root_domain_mode: String,
    root_domain_redirect_url: Option<String>,
}

impl From<TenantRow> for TenantRecord {
    fn from(row: TenantRow) -> Self {
        let root_domain_mode = row.root_domain_mode.parse().unwrap_or_else(|e| {
            warn!("Tenant {}: {}, falling back to bio", row.id, e);
            RootDomainMode::Bio
        });

        Self {
            user_id: row.id,
            username: row.username,
            root_domain_mode,
            root_domain_redirect_url: row.root_domain_redirect_url,
        }
    }
}

/// PostgreSQL repository for tenant lookups.
///
/// Both lookups hit unique indexes; custom domains additionally require the
/// DNS verification flag.
pub struct PgTenantRepository {
    pool: Arc<PgPool>,
}

impl PgTenantRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TenantRepository for PgTenantRepository {
    async fn find_by_subdomain(&self, subdomain: &str) -> Result<Option<TenantRecord>, AppError> {
        let row = sqlx::query_as::<_, TenantRow>(
            r#"
            SELECT id, username, root_domain_mode, root_domain_redirect_url
            FROM tenants
            WHERE subdomain = $1
            "#,
        )
        .bind(subdomain)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(TenantRecord::from))
    }

    async fn find_by_custom_domain(
        &self,
        host: &str,
    ) -> Result<Option<TenantRecord>, AppError> {
        let row = sqlx::query_as::<_, TenantRow>(
            r#"
            SELECT id, username, root_domain_mode, root_domain_redirect_url
            FROM tenants
            WHERE custom_domain = $1 AND custom_domain_verified = TRUE
            "#,
        )
        .bind(host)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(TenantRecord::from))
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(self.pool.as_ref())
            .await?;
        Ok(())
    }
}
