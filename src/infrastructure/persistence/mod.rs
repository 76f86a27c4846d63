//! PostgreSQL repository implementations.
//!
//! Concrete implementations of the domain repository traits using SQLx.
//!
//! # Repositories
//!
//! - [`PgTenantRepository`] - Tenant lookup by subdomain or verified custom domain
//! - [`PgShortLinkRepository`] - Active short link lookup
//! - [`PgAnalyticsRepository`] - Analytics events and click counters

pub mod pg_analytics_repository;
pub mod pg_short_link_repository;
pub mod pg_tenant_repository;

pub use pg_analytics_repository::PgAnalyticsRepository;
pub use pg_short_link_repository::PgShortLinkRepository;
pub use pg_tenant_repository::PgTenantRepository;
