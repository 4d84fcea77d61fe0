//! # Controller
//!
//! The KfDef reconciler and the registry of resource kinds it owns.

pub mod reconciler;

pub use reconciler::{error_policy, reconcile, Context, ReconcilerError};

use crate::scheme::{WatchSpec, MATCH_ANY};

/// The resource kinds this operator watches and owns.
///
/// This is the sole input driving the metrics ownership filter: only kinds
/// matching one of these specs are reported as managed by this operator.
/// Constructed fresh per call so callers hold an explicit, immutable value
/// rather than ambient global state.
pub fn watched_resources() -> Vec<WatchSpec> {
    vec![WatchSpec::new("kfdef.apps.kubeflow.org", MATCH_ANY, "KfDef")]
}
