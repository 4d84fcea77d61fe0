//! # Constants
//!
//! Process-wide defaults for the KfDef operator. Every value here can be
//! overridden through environment variables or CLI flags; see [`crate::config`].

/// Host the metrics listeners bind to.
pub const DEFAULT_METRICS_HOST: &str = "0.0.0.0";

/// Port for operator-process metrics (reconciliations, errors, requeues).
pub const DEFAULT_METRICS_PORT: u16 = 8383;

/// Port for custom-resource metrics (per-GVK resource counts).
pub const DEFAULT_CR_METRICS_PORT: u16 = 8686;

/// Name of the coordination Lease backing leader election.
/// One elected leader per logical deployment of this operator.
pub const LEADER_LOCK_NAME: &str = "kfdef-operator-lock";

/// Lease time-to-live. A crashed leader is superseded after this long.
pub const LEASE_TTL_SECS: u64 = 15;

/// How often the holder re-asserts (or a candidate re-attempts) the lease.
pub const LEASE_RENEW_INTERVAL_SECS: u64 = 5;

/// How long to wait for the metrics HTTP server to bind before giving up.
pub const SERVER_STARTUP_TIMEOUT_SECS: u64 = 30;

/// Poll interval while waiting for the metrics HTTP server to bind.
pub const SERVER_POLL_INTERVAL_MS: u64 = 100;

/// Steady-state requeue interval for reconciled KfDef resources.
pub const RECONCILE_REQUEUE_SECS: u64 = 300;

/// Requeue interval after a reconciliation error.
pub const ERROR_REQUEUE_SECS: u64 = 60;

/// Refresh interval for the per-GVK resource-count gauges.
pub const CR_METRICS_REFRESH_SECS: u64 = 60;

/// Environment variable naming the namespace(s) to watch.
/// Empty or unset means all namespaces; a comma-separated list means a
/// fixed set; anything else a single namespace.
pub const WATCH_NAMESPACE_ENV: &str = "WATCH_NAMESPACE";

/// Environment variable carrying this pod's name (leader-election identity).
pub const POD_NAME_ENV: &str = "POD_NAME";

/// Environment variable carrying the namespace this operator runs in.
pub const POD_NAMESPACE_ENV: &str = "POD_NAMESPACE";

/// In-cluster fallback for the operator namespace when the env var is unset.
pub const SERVICE_ACCOUNT_NAMESPACE_PATH: &str =
    "/var/run/secrets/kubernetes.io/serviceaccount/namespace";

/// Name of the Service fronting the metrics ports.
pub const METRICS_SERVICE_NAME: &str = "kfdef-operator-metrics";

/// Port name for operator-process metrics on the metrics Service.
pub const OPERATOR_METRICS_PORT_NAME: &str = "http-metrics";

/// Port name for custom-resource metrics on the metrics Service.
pub const CR_METRICS_PORT_NAME: &str = "cr-metrics";
