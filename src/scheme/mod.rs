//! # Scheme Registry
//!
//! The registered-type universe and the watch-ownership filter.
//!
//! The operator's type registry ([`KfDefTypes`]) enumerates every
//! Group/Version/Kind the operator's composed manifests can touch. Only a
//! small subset of that universe is actually owned and watched by this
//! operator; [`filter_gvks`] narrows the universe down to that subset so
//! per-resource metrics are generated only for kinds this process manages.

use async_trait::async_trait;
use kube::api::{Api, GroupVersionKind, ListParams};
use kube::Client;
use thiserror::Error;
use tracing::info;

use crate::crd::KfDef;

/// Wildcard marker matching any value of a [`WatchSpec`] field.
pub const MATCH_ANY: &str = "*";

/// A Group/Version/Kind pattern describing resources this operator watches.
///
/// Each field is either a concrete value or [`MATCH_ANY`]. Matching is
/// case-sensitive string equality per field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchSpec {
    pub group: String,
    pub version: String,
    pub kind: String,
}

impl WatchSpec {
    pub fn new(group: &str, version: &str, kind: &str) -> Self {
        Self {
            group: group.to_string(),
            version: version.to_string(),
            kind: kind.to_string(),
        }
    }

    /// Whether this spec matches the given descriptor.
    ///
    /// A spec with all three fields wildcarded matches nothing. That guard is
    /// load-bearing: without it a placeholder `{*,*,*}` entry would claim the
    /// entire registered universe for this operator's metrics.
    pub fn matches(&self, gvk: &GroupVersionKind) -> bool {
        if self.group == MATCH_ANY && self.version == MATCH_ANY && self.kind == MATCH_ANY {
            return false;
        }
        (self.group == MATCH_ANY || self.group == gvk.group)
            && (self.version == MATCH_ANY || self.version == gvk.version)
            && (self.kind == MATCH_ANY || self.kind == gvk.kind)
    }
}

/// Filter the registered GVK universe down to the kinds owned by this operator.
///
/// Order-preserving over `all`; no deduplication is performed. A descriptor
/// matching several specs is appended once per matching spec, mirroring the
/// one-inclusion-per-match loop this operator has always used.
pub fn filter_gvks(all: &[GroupVersionKind], specs: &[WatchSpec]) -> Vec<GroupVersionKind> {
    let mut owned = Vec::new();
    for gvk in all {
        for spec in specs {
            if spec.matches(gvk) {
                owned.push(gvk.clone());
            }
        }
    }
    owned
}

/// Error verifying the operator's resource types against the cluster.
#[derive(Debug, Error)]
pub enum SchemeError {
    #[error("KfDef CRD is not queryable: {0}")]
    CrdNotQueryable(#[source] kube::Error),
}

/// Capability interface over the operator's resource-type registry.
///
/// Implementations know which GVKs the operator's manifests register and can
/// verify the cluster is able to serve the operator's own custom types.
#[async_trait]
pub trait ResourceTypes: Send + Sync {
    /// Verify the cluster can serve the operator's custom types.
    ///
    /// The Rust client (de)serializes types at compile time, so the runtime
    /// step that can still fail is the CRD being absent from the cluster.
    async fn verify(&self, client: &Client) -> Result<(), SchemeError>;

    /// Every GVK registered by the operator's composed manifests.
    fn registered_gvks(&self) -> Vec<GroupVersionKind>;
}

/// The KfDef operator's type registry.
#[derive(Debug, Clone, Copy, Default)]
pub struct KfDefTypes;

#[async_trait]
impl ResourceTypes for KfDefTypes {
    async fn verify(&self, client: &Client) -> Result<(), SchemeError> {
        let kfdefs: Api<KfDef> = Api::all(client.clone());
        let list = kfdefs
            .list(&ListParams::default().limit(1))
            .await
            .map_err(SchemeError::CrdNotQueryable)?;
        info!(
            resources = list.items.len(),
            "KfDef CRD is installed and queryable"
        );
        Ok(())
    }

    fn registered_gvks(&self) -> Vec<GroupVersionKind> {
        // The deployment manifests compose far more kinds than the operator
        // owns; metrics must not claim ownership of the whole universe.
        vec![
            GroupVersionKind::gvk("kfdef.apps.kubeflow.org", "v1", "KfDef"),
            GroupVersionKind::gvk("", "v1", "Service"),
            GroupVersionKind::gvk("", "v1", "ConfigMap"),
            GroupVersionKind::gvk("", "v1", "Secret"),
            GroupVersionKind::gvk("", "v1", "ServiceAccount"),
            GroupVersionKind::gvk("apps", "v1", "Deployment"),
            GroupVersionKind::gvk("apps", "v1", "StatefulSet"),
            GroupVersionKind::gvk("batch", "v1", "Job"),
            GroupVersionKind::gvk("rbac.authorization.k8s.io", "v1", "Role"),
            GroupVersionKind::gvk("rbac.authorization.k8s.io", "v1", "RoleBinding"),
            GroupVersionKind::gvk("networking.k8s.io", "v1", "Ingress"),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gvk(g: &str, v: &str, k: &str) -> GroupVersionKind {
        GroupVersionKind::gvk(g, v, k)
    }

    #[test]
    fn concrete_spec_matches_exact_descriptor_only() {
        let spec = WatchSpec::new("apps", "v1", "Deployment");
        assert!(spec.matches(&gvk("apps", "v1", "Deployment")));
        assert!(!spec.matches(&gvk("apps", "v1", "StatefulSet")));
        assert!(!spec.matches(&gvk("apps", "v2", "Deployment")));
    }

    #[test]
    fn matching_is_case_sensitive() {
        let spec = WatchSpec::new("apps", "v1", "deployment");
        assert!(!spec.matches(&gvk("apps", "v1", "Deployment")));
    }

    #[test]
    fn all_wildcard_spec_matches_nothing() {
        let spec = WatchSpec::new(MATCH_ANY, MATCH_ANY, MATCH_ANY);
        assert!(!spec.matches(&gvk("apps", "v1", "Deployment")));
        assert!(!spec.matches(&gvk("", "v1", "Service")));
    }

    #[test]
    fn kfdef_is_in_the_registered_universe() {
        let universe = KfDefTypes.registered_gvks();
        assert!(universe
            .iter()
            .any(|g| g.group == "kfdef.apps.kubeflow.org" && g.kind == "KfDef"));
    }
}
