//! Analytical service client
//!
//! Provides an HTTP implementation of [`DashboardApi`](crate::domain::ports::DashboardApi):
//! - One retry for transient read failures
//! - Error classification into the dashboard taxonomy
//! - A caching decorator with targeted invalidation

pub mod cached;
pub mod client;
pub mod error;
pub mod retry;

pub use cached::{CachedDashboardApi, REPORT_INVALIDATES, RUN_INVALIDATES};
pub use client::{ApiClientConfig, HttpDashboardApi};
pub use error::ApiError;
pub use retry::RetryPolicy;
