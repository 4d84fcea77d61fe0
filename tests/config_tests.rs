//! # Configuration Unit Tests
//!
//! Unit tests for watch-scope resolution and the manager configuration
//! derived from it.
//!
//! These tests verify:
//! - The three watch-scope forms (all / single / set)
//! - Multi-namespace scope clearing the single-namespace field
//! - Metrics bind-address formatting and CLI overrides

use kfdef_operator::config::{Cli, OperatorConfig, WatchScope};
use kfdef_operator::manager::{CacheStrategy, ManagerConfig};

#[test]
fn test_resolve_empty_is_all_namespaces() {
    assert_eq!(WatchScope::resolve(""), WatchScope::AllNamespaces);
}

#[test]
fn test_resolve_single_namespace() {
    assert_eq!(
        WatchScope::resolve("ns1"),
        WatchScope::SingleNamespace("ns1".to_string())
    );
}

#[test]
fn test_resolve_namespace_set_preserves_order() {
    assert_eq!(
        WatchScope::resolve("ns1,ns2"),
        WatchScope::NamespaceSet(vec!["ns1".to_string(), "ns2".to_string()])
    );
}

#[test]
fn test_resolve_does_not_trim_or_dedup() {
    assert_eq!(
        WatchScope::resolve("ns1, ns1"),
        WatchScope::NamespaceSet(vec!["ns1".to_string(), " ns1".to_string()])
    );
}

#[test]
fn test_trailing_comma_yields_empty_member() {
    // The deployment manifest owns the exact spelling; a trailing comma
    // surfaces as an empty namespace rather than being silently dropped.
    assert_eq!(
        WatchScope::resolve("ns1,"),
        WatchScope::NamespaceSet(vec!["ns1".to_string(), String::new()])
    );
}

#[test]
fn test_namespace_set_uses_multi_namespace_cache_with_cleared_namespace() {
    let scope = WatchScope::resolve("team-a,team-b");
    let config = ManagerConfig::from_scope(&scope, "0.0.0.0:8383".to_string());

    assert_eq!(config.namespace, None);
    assert_eq!(
        config.cache,
        CacheStrategy::MultiNamespace(vec!["team-a".to_string(), "team-b".to_string()])
    );
}

#[test]
fn test_single_namespace_sets_the_namespace_field() {
    let scope = WatchScope::resolve("kubeflow");
    let config = ManagerConfig::from_scope(&scope, "0.0.0.0:8383".to_string());

    assert_eq!(config.namespace.as_deref(), Some("kubeflow"));
    assert_eq!(config.cache, CacheStrategy::SingleScope);
}

#[test]
fn test_metrics_addresses_use_defaults() {
    let config = base_config();
    assert_eq!(config.metrics_addr(), "0.0.0.0:8383");
    assert_eq!(config.cr_metrics_addr(), "0.0.0.0:8686");
}

#[test]
fn test_cli_overrides_win_over_environment_values() {
    let cli = Cli {
        metrics_host: Some("127.0.0.1".to_string()),
        metrics_port: Some(9090),
        cr_metrics_port: None,
        watch_namespace: Some("team-a,team-b".to_string()),
    };

    let config = base_config().with_overrides(&cli);
    assert_eq!(config.metrics_addr(), "127.0.0.1:9090");
    assert_eq!(config.cr_metrics_addr(), "127.0.0.1:8686");
    assert_eq!(
        config.watch_scope,
        WatchScope::NamespaceSet(vec!["team-a".to_string(), "team-b".to_string()])
    );
}

/// A config with default values, bypassing the process environment so tests
/// stay independent of it.
fn base_config() -> OperatorConfig {
    OperatorConfig {
        watch_scope: WatchScope::AllNamespaces,
        metrics_host: "0.0.0.0".to_string(),
        metrics_port: 8383,
        cr_metrics_port: 8686,
        operator_namespace: "kubeflow".to_string(),
    }
}
