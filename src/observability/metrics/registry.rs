//! # Metrics Registry
//!
//! Prometheus metrics registry setup and registration.
//!
//! Two registries back the two listeners: operator-process metrics on the
//! general metrics port and per-resource-kind metrics on the CR metrics port.

use prometheus::Registry;
use std::sync::LazyLock;

/// Registry behind the operator-process metrics listener.
pub(crate) static REGISTRY: LazyLock<Registry> = LazyLock::new(Registry::new);

/// Registry behind the custom-resource metrics listener.
pub(crate) static CR_REGISTRY: LazyLock<Registry> = LazyLock::new(Registry::new);

/// Snapshot of the operator-process registry for serving.
pub fn operator_registry() -> Registry {
    REGISTRY.clone()
}

/// Snapshot of the custom-resource registry for serving.
pub fn cr_registry() -> Registry {
    CR_REGISTRY.clone()
}

/// Register all metrics with their Prometheus registries.
///
/// Prometheus `Registry::register()` takes ownership (`Box<dyn Collector>`),
/// so we clone the metrics. Metrics internally use Arc, so cloning is cheap.
pub fn register_metrics() -> Result<(), prometheus::Error> {
    super::operator_metrics::register_operator_metrics()?;
    super::resource_metrics::register_resource_metrics()?;
    Ok(())
}
