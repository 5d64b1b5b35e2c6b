//! # Utility Modules
//!
//! Supporting utilities for logging and observability.
//!
//! ## Components
//! - **Logging**: structured logging configuration
//! - **Metrics**: thread-safe datagram counters

pub mod logging;
pub mod metrics;

// Re-export for callers that only want the counters
pub use metrics::{global_metrics, Metrics, MetricsSnapshot};
