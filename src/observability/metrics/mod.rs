//! # Metrics Module
//!
//! Prometheus metrics for monitoring the operator, organized by responsibility.
//!
//! ## Sub-modules
//!
//! - `registry` - Metrics registry setup and registration
//! - `operator_metrics` - Operator-process metrics (reconciliations, errors, requeues)
//! - `resource_metrics` - Per-GVK resource-count metrics for owned kinds

pub mod operator_metrics;
pub mod registry;
pub mod resource_metrics;

pub use operator_metrics::*;
pub use registry::*;
pub use resource_metrics::*;
