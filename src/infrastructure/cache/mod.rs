//! In-process caching for tenant lookups.
//!
//! Provides [`TtlCache`], a generic concurrent map whose entries expire after
//! a per-entry TTL. Caches are instance-local: there is no cross-instance
//! invalidation, so staleness is bounded by the TTL alone.

mod ttl_cache;

pub use ttl_cache::{CacheEntry, CachedLookup, TtlCache};
