//! # Resource Metrics
//!
//! Per-resource-kind metrics for the GVKs this operator owns.
//!
//! Only kinds that pass the ownership filter are reported here; registering
//! the whole scheme universe would explode metrics cardinality and
//! misrepresent ownership of kinds this operator does not manage.

use kube::api::GroupVersionKind;
use prometheus::IntGaugeVec;
use std::sync::LazyLock;

use crate::observability::metrics::registry::CR_REGISTRY;

static MANAGED_RESOURCE_COUNT: LazyLock<IntGaugeVec> = LazyLock::new(|| {
    IntGaugeVec::new(
        prometheus::Opts::new(
            "kfdef_operator_managed_resource_count",
            "Number of observed resources per owned Group/Version/Kind",
        ),
        &["group", "version", "kind", "namespace"],
    )
    .expect("Failed to create MANAGED_RESOURCE_COUNT metric - this should never happen")
});

/// Register resource metrics with the CR registry
pub(crate) fn register_resource_metrics() -> Result<(), prometheus::Error> {
    CR_REGISTRY.register(Box::new(MANAGED_RESOURCE_COUNT.clone()))?;
    Ok(())
}

/// Record the observed resource count for an owned kind in a namespace.
pub fn set_managed_resource_count(gvk: &GroupVersionKind, namespace: &str, count: i64) {
    MANAGED_RESOURCE_COUNT
        .with_label_values(&[&gvk.group, &gvk.version, &gvk.kind, namespace])
        .set(count);
}
