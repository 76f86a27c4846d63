//! Infrastructure layer for external integrations.
//!
//! Implements the interfaces defined by the domain layer.
//!
//! # Modules
//!
//! - [`cache`] - Instance-local TTL cache
//! - [`persistence`] - PostgreSQL repository implementations

pub mod cache;
pub mod persistence;
