//! Domain layer containing the routing core's business logic.
//!
//! Everything here is independent of HTTP and storage details:
//!
//! - [`host`] - Hostname classification into addressing modes
//! - [`path`] - Path segmentation and reserved routes
//! - [`decision`] - The routing decision produced per request
//! - [`entities`] - Tenants, short links and visitor metadata
//! - [`repositories`] - Collaborator contracts
//! - [`analytics_event`] - Analytics event model
//! - [`analytics_worker`] - Fire-and-forget side-effect queue and worker
//!
//! # Side-Effect Flow
//!
//! 1. A redirect decision builds an [`analytics_event::AnalyticsEvent`]
//! 2. [`analytics_worker::EventSink`] pushes it to a bounded channel (non-blocking)
//! 3. [`analytics_worker::run_analytics_worker`] persists it with retry
//! 4. Rows land via [`repositories::AnalyticsRepository`]

pub mod analytics_event;
pub mod analytics_worker;
pub mod decision;
pub mod entities;
pub mod host;
pub mod path;
pub mod repositories;
