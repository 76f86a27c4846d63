//! Data Transfer Objects for request parameters and JSON responses.
//!
//! All DTOs use Serde for (de)serialization.

pub mod health;
pub mod short_link;
