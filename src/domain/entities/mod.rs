//! Core domain entities used by the routing core.
//!
//! - [`TenantRecord`] - A tenant resolved from a subdomain or custom domain
//! - [`ShortLinkRecord`] - A short link and its destination
//! - [`LinkScope`] - The address space a short code is resolved in
//! - [`VisitorInfo`] - Client metadata for analytics

pub mod short_link;
pub mod tenant;
pub mod visitor;

pub use short_link::{LinkScope, ShortLinkRecord};
pub use tenant::{RootDomainMode, TenantRecord};
pub use visitor::VisitorInfo;
