//! # Custom Resource Definitions
//!
//! CRD types for the KfDef operator.
//!
//! A `KfDef` resource describes one Kubeflow deployment: the set of
//! applications to install and the platform version to track. The operator
//! reconciles these resources and reports progress through the status block.

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// KfDef Custom Resource Definition
///
/// # Example
///
/// ```yaml
/// apiVersion: kfdef.apps.kubeflow.org/v1
/// kind: KfDef
/// metadata:
///   name: kubeflow
///   namespace: kubeflow
/// spec:
///   version: v1.1.0
///   applications:
///     - name: jupyter-web-app
///       kustomizeConfig:
///         repoRef:
///           name: manifests
///           path: jupyter/jupyter-web-app
/// ```
#[derive(CustomResource, Debug, Clone, Deserialize, Serialize, JsonSchema)]
#[kube(
    kind = "KfDef",
    group = "kfdef.apps.kubeflow.org",
    version = "v1",
    namespaced,
    status = "KfDefStatus",
    printcolumn = r#"{"name":"Version", "type":"string", "jsonPath":".spec.version"}, {"name":"Phase", "type":"string", "jsonPath":".status.phase"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct KfDefSpec {
    /// Platform version this deployment tracks (e.g. "v1.1.0")
    #[serde(default)]
    pub version: Option<String>,
    /// Applications composing the deployment, applied in order
    #[serde(default)]
    pub applications: Vec<Application>,
    /// Manifest repositories the applications are sourced from
    #[serde(default)]
    pub repos: Vec<Repo>,
}

/// One application within a KfDef deployment
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    /// Application name, unique within the deployment
    pub name: String,
    /// Kustomize source for the application manifests
    #[serde(default)]
    pub kustomize_config: Option<KustomizeConfig>,
}

/// Kustomize source configuration for an application
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct KustomizeConfig {
    /// Repository reference the kustomization is read from
    #[serde(default)]
    pub repo_ref: Option<RepoRef>,
    /// Kustomize parameter overrides
    #[serde(default)]
    pub parameters: Vec<NameValue>,
}

/// Reference into a registered manifest repository
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RepoRef {
    /// Name of a repo listed in `spec.repos`
    pub name: String,
    /// Path within the repository
    pub path: String,
}

/// Named manifest repository
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Repo {
    /// Name the applications reference this repo by
    pub name: String,
    /// Archive URI the repo is fetched from
    pub uri: String,
}

/// Name/value parameter pair
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct NameValue {
    pub name: String,
    pub value: String,
}

/// Status of a KfDef resource
#[derive(Debug, Clone, Default, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct KfDefStatus {
    /// Current lifecycle phase
    #[serde(default)]
    pub phase: Option<KfDefPhase>,
    /// Observed conditions, newest last
    #[serde(default)]
    pub conditions: Vec<KfDefCondition>,
}

/// Lifecycle phase of a KfDef deployment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
pub enum KfDefPhase {
    Pending,
    Deploying,
    Available,
    Failed,
}

/// One observed condition on a KfDef resource
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct KfDefCondition {
    /// Condition type (e.g. "Available")
    pub r#type: String,
    /// "True", "False", or "Unknown"
    pub status: String,
    /// Machine-readable reason for the last transition
    #[serde(default)]
    pub reason: Option<String>,
    /// Human-readable detail
    #[serde(default)]
    pub message: Option<String>,
}
