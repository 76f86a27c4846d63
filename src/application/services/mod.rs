//! Business logic services for the application layer.

pub mod routing_engine;
pub mod short_link_resolver;
pub mod tenant_resolver;

pub use routing_engine::{RoutingEngine, RoutingRequest};
pub use short_link_resolver::ShortLinkResolver;
pub use tenant_resolver::{LookupKind, ResolverSettings, TenantResolver};
