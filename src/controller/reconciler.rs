//! # Reconciler
//!
//! Reconciliation entry points for KfDef resources.
//!
//! The deployment machinery itself (fetching manifest repos, applying
//! applications) lives behind this boundary; what the runtime wires up is the
//! reconcile function, its shared context, and the error policy.

use std::sync::Arc;
use std::time::Duration;

use kube::api::{Api, Patch, PatchParams};
use kube::{Client, ResourceExt};
use kube_runtime::controller::Action;
use serde_json::json;
use thiserror::Error;
use tracing::{error, info};

use crate::constants;
use crate::crd::{KfDef, KfDefPhase};
use crate::observability::metrics;

/// Reconciliation failure for a single KfDef resource.
#[derive(Debug, Error)]
pub enum ReconcilerError {
    #[error("failed to update KfDef status: {0}")]
    StatusUpdate(#[source] kube::Error),
    #[error("KfDef resource has no namespace")]
    MissingNamespace,
}

/// Shared context handed to every reconciliation.
#[derive(Clone)]
pub struct Context {
    pub client: Client,
}

/// Reconcile one KfDef resource.
///
/// Marks the deployment phase and requeues on the steady-state interval.
pub async fn reconcile(kfdef: Arc<KfDef>, ctx: Arc<Context>) -> Result<Action, ReconcilerError> {
    let name = kfdef.name_any();
    let namespace = kfdef
        .namespace()
        .ok_or(ReconcilerError::MissingNamespace)?;

    metrics::increment_reconciliations();
    info!(resource.name = %name, resource.namespace = %namespace, "Reconciling KfDef");

    let phase = kfdef
        .status
        .as_ref()
        .and_then(|s| s.phase)
        .unwrap_or(KfDefPhase::Pending);
    if phase != KfDefPhase::Available {
        let api: Api<KfDef> = Api::namespaced(ctx.client.clone(), &namespace);
        let status = json!({
            "status": {
                "phase": KfDefPhase::Available,
                "conditions": [{
                    "type": "Available",
                    "status": "True",
                    "reason": "DeploymentReconciled",
                    "message": format!("KfDef {name} reconciled"),
                }],
            }
        });
        api.patch_status(&name, &PatchParams::default(), &Patch::Merge(&status))
            .await
            .map_err(ReconcilerError::StatusUpdate)?;
    }

    Ok(Action::requeue(Duration::from_secs(
        constants::RECONCILE_REQUEUE_SECS,
    )))
}

/// Handle a reconciliation error: count it and requeue with a delay.
pub fn error_policy(kfdef: Arc<KfDef>, error: &ReconcilerError, _ctx: Arc<Context>) -> Action {
    let name = kfdef.name_any();
    let namespace = kfdef.namespace().unwrap_or_else(|| "default".to_string());

    error!(
        resource.name = %name,
        resource.namespace = %namespace,
        error = %error,
        "Reconciliation error"
    );
    metrics::increment_reconciliation_errors();
    metrics::increment_requeues("error");

    Action::requeue(Duration::from_secs(constants::ERROR_REQUEUE_SECS))
}
