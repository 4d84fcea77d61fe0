//! # Metrics Exposure Unit Tests
//!
//! Unit tests for the cluster-facing metrics publication pieces that can be
//! checked without a cluster.
//!
//! These tests verify:
//! - The "prometheus-operator not installed" condition is classified apart
//!   from other ServiceMonitor failures
//! - The metrics Service carries both named ports

use k8s_openapi::api::core::v1::ServicePort;
use k8s_openapi::apimachinery::pkg::util::intstr::IntOrString;
use kube::core::ErrorResponse;

use kfdef_operator::constants;
use kfdef_operator::observability::exposure::{
    classify_service_monitor_error, metrics_service, ServiceMonitorError,
};

fn api_error(code: u16, reason: &str) -> kube::Error {
    kube::Error::Api(ErrorResponse {
        status: "Failure".to_string(),
        message: "the server could not find the requested resource".to_string(),
        reason: reason.to_string(),
        code,
    })
}

#[test]
fn test_missing_service_monitor_crd_is_not_present() {
    let classified = classify_service_monitor_error(api_error(404, "NotFound"));
    assert!(matches!(classified, ServiceMonitorError::NotPresent));
}

#[test]
fn test_forbidden_service_monitor_error_is_other() {
    let classified = classify_service_monitor_error(api_error(403, "Forbidden"));
    assert!(matches!(classified, ServiceMonitorError::Other(_)));
}

#[test]
fn test_server_error_is_other() {
    let classified = classify_service_monitor_error(api_error(500, "InternalError"));
    assert!(matches!(classified, ServiceMonitorError::Other(_)));
}

#[test]
fn test_metrics_service_exposes_both_ports() {
    let ports = vec![
        ServicePort {
            name: Some(constants::OPERATOR_METRICS_PORT_NAME.to_string()),
            port: 8383,
            target_port: Some(IntOrString::Int(8383)),
            protocol: Some("TCP".to_string()),
            ..ServicePort::default()
        },
        ServicePort {
            name: Some(constants::CR_METRICS_PORT_NAME.to_string()),
            port: 8686,
            target_port: Some(IntOrString::Int(8686)),
            protocol: Some("TCP".to_string()),
            ..ServicePort::default()
        },
    ];

    let service = metrics_service("kubeflow", ports);
    assert_eq!(
        service.metadata.name.as_deref(),
        Some(constants::METRICS_SERVICE_NAME)
    );
    assert_eq!(service.metadata.namespace.as_deref(), Some("kubeflow"));

    let spec = service.spec.expect("service has a spec");
    let port_names: Vec<_> = spec
        .ports
        .expect("service has ports")
        .into_iter()
        .filter_map(|p| p.name)
        .collect();
    assert_eq!(
        port_names,
        vec![
            constants::OPERATOR_METRICS_PORT_NAME.to_string(),
            constants::CR_METRICS_PORT_NAME.to_string(),
        ]
    );
}
