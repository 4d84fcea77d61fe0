//! # Metrics Exposure
//!
//! Cluster-facing metrics publication: serving per-resource-kind metrics for
//! the GVKs this operator owns, exposing both metrics ports through a
//! Service, and registering a prometheus-operator ServiceMonitor.
//!
//! Every step here is observability, not correctness: failures are logged
//! and the operator keeps reconciling.

use std::sync::Arc;

use anyhow::Result;
use k8s_openapi::api::core::v1::{Service, ServicePort, ServiceSpec};
use k8s_openapi::apimachinery::pkg::util::intstr::IntOrString;
use kube::api::{Api, DynamicObject, GroupVersionKind, ListParams, ObjectMeta, PostParams};
use kube::discovery::{pinned_kind, Scope};
use kube::Client;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::config::OperatorConfig;
use crate::constants;
use crate::observability::metrics;
use crate::observability::server::{start_server, wait_until_ready, ServerState};
use crate::scheme::{filter_gvks, ResourceTypes, WatchSpec};

/// ServiceMonitor registration failure.
///
/// The "integration not installed" condition is its own variant: a cluster
/// without prometheus-operator is an expected deployment configuration, not
/// an error in this operator.
#[derive(Debug, Error)]
pub enum ServiceMonitorError {
    #[error("ServiceMonitor CRD is not present in the cluster")]
    NotPresent,
    #[error("failed to create ServiceMonitor: {0}")]
    Other(#[source] kube::Error),
}

/// Classify a ServiceMonitor creation failure.
///
/// A 404 from discovery or creation means the monitoring.coreos.com API is
/// not served, i.e. prometheus-operator is not installed.
pub fn classify_service_monitor_error(err: kube::Error) -> ServiceMonitorError {
    match &err {
        kube::Error::Api(ae) if ae.code == 404 => ServiceMonitorError::NotPresent,
        _ => ServiceMonitorError::Other(err),
    }
}

/// Publish the operator's metrics surface to the cluster.
///
/// Computes the owned-GVK set, serves custom-resource metrics for it, and
/// creates the Service / ServiceMonitor objects fronting both metrics ports.
/// Each step is independently fault-tolerant.
pub async fn publish(
    client: &Client,
    types: &dyn ResourceTypes,
    watched: &[WatchSpec],
    config: &OperatorConfig,
) {
    let filtered = filter_gvks(&types.registered_gvks(), watched);
    info!(
        owned_kinds = filtered.len(),
        registered_kinds = types.registered_gvks().len(),
        "Filtered scheme universe down to owned kinds"
    );

    if let Err(e) = serve_cr_metrics(client, filtered, config).await {
        error!("Could not generate and serve custom resource metrics. Error: {e}.");
    }

    if let Err(e) = create_metrics_service(client, config).await {
        error!("Could not create metrics Service. Error: {e}.");
    }

    match create_service_monitor(client, config).await {
        Ok(()) => info!("Created ServiceMonitor for metrics scraping"),
        Err(ServiceMonitorError::NotPresent) => {
            warn!(
                "ServiceMonitor CRD not found. Install prometheus-operator in your cluster \
                 to create ServiceMonitor objects."
            );
        }
        Err(e) => error!("Could not create ServiceMonitor object. Error: {e}."),
    }
}

/// Serve per-kind resource counts for the owned GVKs on the CR metrics port.
///
/// Counts are scoped to the operator's own namespace and refreshed
/// periodically in the background.
async fn serve_cr_metrics(
    client: &Client,
    filtered: Vec<GroupVersionKind>,
    config: &OperatorConfig,
) -> Result<()> {
    refresh_resource_counts(client, &filtered, &config.operator_namespace).await;

    let state = Arc::new(ServerState::new());
    let addr = config.cr_metrics_addr();
    let server_state = state.clone();
    let server_handle = tokio::spawn(async move {
        if let Err(e) = start_server(&addr, metrics::cr_registry(), server_state).await {
            error!("Custom resource metrics server error: {e}");
        }
    });
    wait_until_ready(&state, &server_handle).await?;

    let refresh_client = client.clone();
    let namespace = config.operator_namespace.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(std::time::Duration::from_secs(
            constants::CR_METRICS_REFRESH_SECS,
        ));
        interval.tick().await; // immediate tick; counts were just refreshed
        loop {
            interval.tick().await;
            refresh_resource_counts(&refresh_client, &filtered, &namespace).await;
        }
    });

    Ok(())
}

/// Refresh the resource-count gauge for each owned GVK.
///
/// Kinds that cannot be listed (missing CRD, RBAC) are logged and skipped;
/// one broken kind must not silence the others.
async fn refresh_resource_counts(
    client: &Client,
    gvks: &[GroupVersionKind],
    namespace: &str,
) {
    for gvk in gvks {
        let (ar, caps) = match pinned_kind(client, gvk).await {
            Ok(found) => found,
            Err(e) => {
                warn!(
                    group = %gvk.group, version = %gvk.version, kind = %gvk.kind,
                    "Could not discover owned kind: {e}"
                );
                continue;
            }
        };
        let api: Api<DynamicObject> = if matches!(caps.scope, Scope::Namespaced) {
            Api::namespaced_with(client.clone(), namespace, &ar)
        } else {
            Api::all_with(client.clone(), &ar)
        };
        match api.list(&ListParams::default()).await {
            Ok(list) => {
                metrics::set_managed_resource_count(gvk, namespace, list.items.len() as i64);
            }
            Err(e) => {
                warn!(
                    group = %gvk.group, version = %gvk.version, kind = %gvk.kind,
                    "Could not list owned kind: {e}"
                );
            }
        }
    }
}

/// Create the Service exposing both metrics ports.
///
/// An already-existing Service from a previous run is success.
async fn create_metrics_service(client: &Client, config: &OperatorConfig) -> Result<()> {
    let ports = vec![
        ServicePort {
            name: Some(constants::OPERATOR_METRICS_PORT_NAME.to_string()),
            port: i32::from(config.metrics_port),
            target_port: Some(IntOrString::Int(i32::from(config.metrics_port))),
            protocol: Some("TCP".to_string()),
            ..ServicePort::default()
        },
        ServicePort {
            name: Some(constants::CR_METRICS_PORT_NAME.to_string()),
            port: i32::from(config.cr_metrics_port),
            target_port: Some(IntOrString::Int(i32::from(config.cr_metrics_port))),
            protocol: Some("TCP".to_string()),
            ..ServicePort::default()
        },
    ];
    let service = metrics_service(&config.operator_namespace, ports);

    let api: Api<Service> = Api::namespaced(client.clone(), &config.operator_namespace);
    match api.create(&PostParams::default(), &service).await {
        Ok(_) => {
            info!(
                name = constants::METRICS_SERVICE_NAME,
                "Created metrics Service"
            );
            Ok(())
        }
        Err(kube::Error::Api(ae)) if ae.code == 409 => {
            info!(
                name = constants::METRICS_SERVICE_NAME,
                "Metrics Service already exists"
            );
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

/// Build the metrics Service object.
pub fn metrics_service(namespace: &str, ports: Vec<ServicePort>) -> Service {
    let labels = [("name".to_string(), constants::METRICS_SERVICE_NAME.to_string())]
        .into_iter()
        .collect::<std::collections::BTreeMap<_, _>>();
    let selector = [("name".to_string(), "kfdef-operator".to_string())]
        .into_iter()
        .collect::<std::collections::BTreeMap<_, _>>();
    Service {
        metadata: ObjectMeta {
            name: Some(constants::METRICS_SERVICE_NAME.to_string()),
            namespace: Some(namespace.to_string()),
            labels: Some(labels),
            ..ObjectMeta::default()
        },
        spec: Some(ServiceSpec {
            ports: Some(ports),
            selector: Some(selector),
            ..ServiceSpec::default()
        }),
        ..Service::default()
    }
}

/// Register a ServiceMonitor pointing Prometheus at the metrics Service.
async fn create_service_monitor(
    client: &Client,
    config: &OperatorConfig,
) -> Result<(), ServiceMonitorError> {
    let gvk = GroupVersionKind::gvk("monitoring.coreos.com", "v1", "ServiceMonitor");
    let (ar, _caps) = pinned_kind(client, &gvk)
        .await
        .map_err(classify_service_monitor_error)?;

    let mut monitor = DynamicObject::new(constants::METRICS_SERVICE_NAME, &ar)
        .within(&config.operator_namespace);
    monitor.data = serde_json::json!({
        "spec": {
            "endpoints": [
                { "port": constants::OPERATOR_METRICS_PORT_NAME },
                { "port": constants::CR_METRICS_PORT_NAME },
            ],
            "selector": {
                "matchLabels": { "name": constants::METRICS_SERVICE_NAME },
            },
        }
    });

    let api: Api<DynamicObject> =
        Api::namespaced_with(client.clone(), &config.operator_namespace, &ar);
    match api.create(&PostParams::default(), &monitor).await {
        Ok(_) => Ok(()),
        Err(kube::Error::Api(ae)) if ae.code == 409 => {
            info!(
                name = constants::METRICS_SERVICE_NAME,
                "ServiceMonitor already exists"
            );
            Ok(())
        }
        Err(e) => Err(classify_service_monitor_error(e)),
    }
}
