//! Repository trait definitions for the domain layer.
//!
//! The routing core consumes its collaborators only through these traits.
//! Implementations live in `crate::infrastructure::persistence`; mock
//! implementations are generated via `mockall` for unit tests.
//!
//! # Available Repositories
//!
//! - [`TenantRepository`] - Tenant lookup by subdomain or custom domain
//! - [`ShortLinkRepository`] - Active short link lookup
//! - [`AnalyticsRepository`] - Analytics events and click counters

pub mod analytics_repository;
pub mod short_link_repository;
pub mod tenant_repository;

pub use analytics_repository::AnalyticsRepository;
pub use short_link_repository::ShortLinkRepository;
pub use tenant_repository::TenantRepository;

#[cfg(test)]
pub use analytics_repository::MockAnalyticsRepository;
#[cfg(test)]
pub use short_link_repository::MockShortLinkRepository;
#[cfg(test)]
pub use tenant_repository::MockTenantRepository;
