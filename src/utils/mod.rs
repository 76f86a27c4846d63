//! Utility functions for request handling.
//!
//! - [`request_meta`] - Host and visitor metadata extraction from headers
//! - [`redirect_target`] - Validation of external redirect URLs

pub mod redirect_target;
pub mod request_meta;
