//! # Observability Module
//!
//! Prometheus metrics, the HTTP listeners serving them, and the cluster
//! objects (Service, ServiceMonitor) that make them scrapeable.

pub mod exposure;
pub mod metrics;
pub mod server;
