//! PostgreSQL implementation of short link repository.

use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::ShortLinkRecord;
use crate::domain::repositories::ShortLinkRepository;
use crate::error::AppError;

#[derive(sqlx::FromRow)]
struct ShortLinkRow {
    id: i64,
    short_code: String,
    destination_url: String,
    owner_user_id: Option<i64>,
    is_active: bool,
}

impl From<ShortLinkRow> for ShortLinkRecord {
    fn from(row: ShortLinkRow) -> Self {
        Self {
            id: row.id,
            short_code: row.short_code,
            destination_url: row.destination_url,
            owner_user_id: row.owner_user_id,
            is_active: row.is_active,
        }
    }
}

/// PostgreSQL repository for short link lookups.
///
/// `IS NOT DISTINCT FROM` makes a `NULL` owner match only unowned links.
pub struct PgShortLinkRepository {
    pool: Arc<PgPool>,
}

impl PgShortLinkRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ShortLinkRepository for PgShortLinkRepository {
    async fn find_active(
        &self,
        code: &str,
        owner_user_id: Option<i64>,
    ) -> Result<Option<ShortLinkRecord>, AppError> {
        let row = sqlx::query_as::<_, ShortLinkRow>(
            r#"
            SELECT id, short_code, destination_url, owner_user_id, is_active
            FROM short_links
            WHERE short_code = $1
              AND owner_user_id IS NOT DISTINCT FROM $2
              AND is_active = TRUE
            "#,
        )
        .bind(code)
        .bind(owner_user_id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(ShortLinkRecord::from))
    }
}
