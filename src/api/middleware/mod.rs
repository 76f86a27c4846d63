//! HTTP middleware for request routing and observability.

pub mod tenant_routing;
pub mod tracing;
