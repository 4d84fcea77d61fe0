//! # CRD Serialization Tests
//!
//! Smoke tests for the generated KfDef CRD manifest and resource
//! round-tripping.

use kube::CustomResourceExt;

use kfdef_operator::crd::{KfDef, KfDefPhase, KfDefSpec, KfDefStatus};

#[test]
fn test_crd_manifest_identifies_the_kfdef_kind() {
    let crd = KfDef::crd();
    assert_eq!(crd.spec.group, "kfdef.apps.kubeflow.org");
    assert_eq!(crd.spec.names.kind, "KfDef");
    assert!(crd.spec.versions.iter().any(|v| v.name == "v1"));
}

#[test]
fn test_crd_manifest_serializes_to_yaml() {
    let yaml = serde_yaml::to_string(&KfDef::crd()).expect("CRD serializes");
    assert!(yaml.contains("kfdef.apps.kubeflow.org"));
    assert!(yaml.contains("KfDef"));
}

#[test]
fn test_kfdef_resource_round_trips_through_json() {
    let kfdef = KfDef::new(
        "kubeflow",
        KfDefSpec {
            version: Some("v1.1.0".to_string()),
            applications: Vec::new(),
            repos: Vec::new(),
        },
    );

    let json = serde_json::to_string(&kfdef).expect("KfDef serializes");
    let parsed: KfDef = serde_json::from_str(&json).expect("KfDef deserializes");
    assert_eq!(parsed.spec.version.as_deref(), Some("v1.1.0"));
}

#[test]
fn test_status_phase_serializes_as_bare_variant_name() {
    let status = KfDefStatus {
        phase: Some(KfDefPhase::Available),
        conditions: Vec::new(),
    };
    let json = serde_json::to_value(&status).expect("status serializes");
    assert_eq!(json["phase"], "Available");
}
