//! # Operator Configuration
//!
//! Operator-level configuration loaded from environment variables, with CLI
//! flag overrides applied on top.
//!
//! The one configuration value with real semantics is the watch-namespace
//! string: empty means all namespaces, a comma-separated list means a fixed
//! set, anything else a single namespace. Failure to read it is deliberately
//! non-fatal; the operator degrades to watching all namespaces.

use std::env;

use clap::Parser;
use tracing::warn;

use crate::constants;

/// Command-line overrides. Environment variables remain the primary
/// configuration source; flags win when both are set.
#[derive(Debug, Clone, Default, Parser)]
#[command(name = "kfdef-operator", version, about = "KfDef deployment operator")]
pub struct Cli {
    /// Host the metrics listeners bind to
    #[arg(long)]
    pub metrics_host: Option<String>,
    /// Port for operator-process metrics
    #[arg(long)]
    pub metrics_port: Option<u16>,
    /// Port for custom-resource metrics
    #[arg(long)]
    pub cr_metrics_port: Option<u16>,
    /// Namespace(s) to watch: empty for all, comma-separated for a set
    #[arg(long)]
    pub watch_namespace: Option<String>,
}

/// The namespace scope this operator watches.
///
/// Derived once per process start; immutable thereafter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchScope {
    /// Watch and manage resources in every namespace
    AllNamespaces,
    /// Watch a single namespace
    SingleNamespace(String),
    /// Watch a fixed, ordered set of namespaces
    NamespaceSet(Vec<String>),
}

impl WatchScope {
    /// Parse a raw watch-namespace value.
    ///
    /// Splitting preserves order and performs no trimming or deduplication;
    /// the deployment manifest owns the exact spelling of each namespace.
    pub fn resolve(raw: &str) -> Self {
        if raw.is_empty() {
            WatchScope::AllNamespaces
        } else if raw.contains(',') {
            WatchScope::NamespaceSet(raw.split(',').map(str::to_string).collect())
        } else {
            WatchScope::SingleNamespace(raw.to_string())
        }
    }

    /// Read the watch scope from `WATCH_NAMESPACE`.
    ///
    /// An unreadable value (unset, or not valid unicode) degrades to
    /// [`WatchScope::AllNamespaces`] with a warning rather than aborting
    /// startup.
    pub fn from_env() -> Self {
        match env::var(constants::WATCH_NAMESPACE_ENV) {
            Ok(raw) => Self::resolve(&raw),
            Err(e) => {
                warn!(
                    "Failed to get watch namespace ({e}). \
                     The operator will watch and manage resources in all namespaces."
                );
                WatchScope::AllNamespaces
            }
        }
    }
}

/// Process-wide operator settings resolved at startup.
#[derive(Debug, Clone)]
pub struct OperatorConfig {
    /// Namespace scope the manager watches
    pub watch_scope: WatchScope,
    /// Host both metrics listeners bind to
    pub metrics_host: String,
    /// Port for operator-process metrics
    pub metrics_port: u16,
    /// Port for custom-resource metrics
    pub cr_metrics_port: u16,
    /// Namespace this operator process runs in
    pub operator_namespace: String,
}

impl OperatorConfig {
    /// Load configuration from environment variables with defaults.
    pub fn from_env() -> Self {
        Self {
            watch_scope: WatchScope::from_env(),
            metrics_host: env::var("METRICS_HOST")
                .unwrap_or_else(|_| constants::DEFAULT_METRICS_HOST.to_string()),
            metrics_port: env_var_or_default("METRICS_PORT", constants::DEFAULT_METRICS_PORT),
            cr_metrics_port: env_var_or_default(
                "CR_METRICS_PORT",
                constants::DEFAULT_CR_METRICS_PORT,
            ),
            operator_namespace: operator_namespace(),
        }
    }

    /// Apply command-line overrides on top of the environment values.
    pub fn with_overrides(mut self, cli: &Cli) -> Self {
        if let Some(host) = &cli.metrics_host {
            self.metrics_host = host.clone();
        }
        if let Some(port) = cli.metrics_port {
            self.metrics_port = port;
        }
        if let Some(port) = cli.cr_metrics_port {
            self.cr_metrics_port = port;
        }
        if let Some(raw) = &cli.watch_namespace {
            self.watch_scope = WatchScope::resolve(raw);
        }
        self
    }

    /// Bind address for the operator-process metrics listener.
    pub fn metrics_addr(&self) -> String {
        format!("{}:{}", self.metrics_host, self.metrics_port)
    }

    /// Bind address for the custom-resource metrics listener.
    pub fn cr_metrics_addr(&self) -> String {
        format!("{}:{}", self.metrics_host, self.cr_metrics_port)
    }
}

/// Identity of this pod, used as the leader-election holder id.
pub fn pod_identity() -> String {
    env::var(constants::POD_NAME_ENV).unwrap_or_else(|_| {
        warn!("POD_NAME not set, using hostname");
        hostname::get()
            .map(|h| h.to_string_lossy().to_string())
            .unwrap_or_else(|_| "unknown".to_string())
    })
}

/// Namespace this operator process is deployed in.
///
/// Best-effort: prefers `POD_NAMESPACE`, falls back to the in-cluster
/// service-account namespace file, then `"default"`.
pub fn operator_namespace() -> String {
    if let Ok(ns) = env::var(constants::POD_NAMESPACE_ENV) {
        return ns;
    }
    match std::fs::read_to_string(constants::SERVICE_ACCOUNT_NAMESPACE_PATH) {
        Ok(ns) if !ns.trim().is_empty() => ns.trim().to_string(),
        _ => {
            warn!("POD_NAMESPACE not set and no in-cluster namespace file, using 'default'");
            "default".to_string()
        }
    }
}

/// Read environment variable or return default value
fn env_var_or_default<T: std::str::FromStr>(key: &str, default: T) -> T
where
    <T as std::str::FromStr>::Err: std::fmt::Debug,
{
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_value_means_all_namespaces() {
        assert_eq!(WatchScope::resolve(""), WatchScope::AllNamespaces);
    }

    #[test]
    fn comma_separated_value_preserves_order_without_trimming() {
        assert_eq!(
            WatchScope::resolve("team-b, team-a"),
            WatchScope::NamespaceSet(vec!["team-b".to_string(), " team-a".to_string()])
        );
    }

    #[test]
    fn single_value_is_a_single_namespace() {
        assert_eq!(
            WatchScope::resolve("kubeflow"),
            WatchScope::SingleNamespace("kubeflow".to_string())
        );
    }
}
