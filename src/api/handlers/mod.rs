//! HTTP request handlers for the routing core's own endpoints.

pub mod fallback;
pub mod health;
pub mod short_link;

pub use fallback::fallback_handler;
pub use health::health_handler;
pub use short_link::short_link_handler;
