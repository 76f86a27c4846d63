//! HTTP layer: routing middleware, handlers, DTOs and response helpers.
//!
//! # Modules
//!
//! - [`dto`] - Data Transfer Objects for request/response serialization
//! - [`handlers`] - HTTP request handlers
//! - [`middleware`] - Tenant routing and observability middleware
//! - [`response`] - No-store redirect and header helpers

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod response;
