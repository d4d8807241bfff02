//! Infrastructure layer module
//!
//! Adapters and external integrations:
//! - Analytical service HTTP client and caching decorator
//! - Configuration management
//! - Logging infrastructure
//!
//! Implementations satisfy the port traits defined in the domain layer.

pub mod api;
pub mod config;
pub mod logging;
