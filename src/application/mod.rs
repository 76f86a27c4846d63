//! Application layer services implementing the routing core.
//!
//! Services consume repository traits and the in-process caches and provide
//! a clean API for the HTTP layer and the admin CLI.
//!
//! # Available Services
//!
//! - [`services::TenantResolver`] - Cache-first tenant lookup by subdomain or custom domain
//! - [`services::ShortLinkResolver`] - Scoped short-link lookup with click tracking
//! - [`services::RoutingEngine`] - Per-request routing decisions

pub mod services;
