//! # GVK Filter Unit Tests
//!
//! Unit tests for the ownership filter that narrows the registered
//! Group/Version/Kind universe down to the kinds this operator watches.
//!
//! These tests verify:
//! - The filtered set is always a subset of the input universe
//! - Empty universe / empty spec registry edge cases
//! - Wildcard matching, including the all-wildcard guard
//! - One-inclusion-per-matching-spec (sequence) semantics

use kube::api::GroupVersionKind;

use kfdef_operator::scheme::{filter_gvks, WatchSpec, MATCH_ANY};

fn gvk(group: &str, version: &str, kind: &str) -> GroupVersionKind {
    GroupVersionKind::gvk(group, version, kind)
}

#[test]
fn test_filter_returns_subset_of_universe() {
    let universe = vec![
        gvk("a", "v1", "Foo"),
        gvk("b", "v1", "Bar"),
        gvk("a", "v1", "Baz"),
    ];
    let specs = vec![
        WatchSpec::new("a", MATCH_ANY, "Foo"),
        WatchSpec::new(MATCH_ANY, MATCH_ANY, "Baz"),
    ];

    let filtered = filter_gvks(&universe, &specs);
    assert!(filtered.iter().all(|g| universe.contains(g)));
}

#[test]
fn test_filter_empty_specs_matches_nothing() {
    let universe = vec![gvk("a", "v1", "Foo"), gvk("b", "v1", "Bar")];
    assert!(filter_gvks(&universe, &[]).is_empty());
}

#[test]
fn test_filter_empty_universe_yields_empty_result() {
    let specs = vec![WatchSpec::new(MATCH_ANY, MATCH_ANY, "Foo")];
    assert!(filter_gvks(&[], &specs).is_empty());
}

#[test]
fn test_all_wildcard_spec_matches_no_descriptor() {
    let universe = vec![
        gvk("a", "v1", "Foo"),
        gvk("", "v1", "Service"),
        gvk("apps", "v1", "Deployment"),
    ];
    let specs = vec![WatchSpec::new(MATCH_ANY, MATCH_ANY, MATCH_ANY)];
    assert!(filter_gvks(&universe, &specs).is_empty());
}

#[test]
fn test_kind_only_spec_matches_every_group_and_version() {
    let universe = vec![
        gvk("a", "v1", "Foo"),
        gvk("b", "v2", "Foo"),
        gvk("a", "v1", "Bar"),
    ];
    let specs = vec![WatchSpec::new(MATCH_ANY, MATCH_ANY, "Foo")];

    let filtered = filter_gvks(&universe, &specs);
    assert_eq!(filtered, vec![gvk("a", "v1", "Foo"), gvk("b", "v2", "Foo")]);
}

#[test]
fn test_mixed_registry_scenario() {
    let universe = vec![
        gvk("a", "v1", "Foo"),
        gvk("b", "v1", "Bar"),
        gvk("a", "v1", "Baz"),
    ];
    let specs = vec![
        WatchSpec::new("a", MATCH_ANY, "Foo"),
        WatchSpec::new(MATCH_ANY, MATCH_ANY, "Baz"),
    ];

    let filtered = filter_gvks(&universe, &specs);
    assert_eq!(filtered, vec![gvk("a", "v1", "Foo"), gvk("a", "v1", "Baz")]);
}

#[test]
fn test_descriptor_matching_two_specs_is_included_twice() {
    // Sequence semantics: one inclusion per matching spec, no dedup.
    let universe = vec![gvk("a", "v1", "Foo")];
    let specs = vec![
        WatchSpec::new("a", "v1", "Foo"),
        WatchSpec::new(MATCH_ANY, MATCH_ANY, "Foo"),
    ];

    let filtered = filter_gvks(&universe, &specs);
    assert_eq!(filtered, vec![gvk("a", "v1", "Foo"), gvk("a", "v1", "Foo")]);
}

#[test]
fn test_duplicate_descriptors_in_universe_are_preserved() {
    let universe = vec![gvk("a", "v1", "Foo"), gvk("a", "v1", "Foo")];
    let specs = vec![WatchSpec::new("a", "v1", "Foo")];

    let filtered = filter_gvks(&universe, &specs);
    assert_eq!(filtered.len(), 2);
}

#[test]
fn test_filter_preserves_universe_order() {
    let universe = vec![
        gvk("z", "v1", "Zed"),
        gvk("a", "v1", "Alpha"),
        gvk("m", "v1", "Mid"),
    ];
    let specs = vec![
        WatchSpec::new(MATCH_ANY, MATCH_ANY, "Alpha"),
        WatchSpec::new(MATCH_ANY, MATCH_ANY, "Zed"),
        WatchSpec::new(MATCH_ANY, MATCH_ANY, "Mid"),
    ];

    let filtered = filter_gvks(&universe, &specs);
    assert_eq!(
        filtered,
        vec![
            gvk("z", "v1", "Zed"),
            gvk("a", "v1", "Alpha"),
            gvk("m", "v1", "Mid"),
        ]
    );
}

#[test]
fn test_core_group_matches_empty_group_field() {
    let universe = vec![gvk("", "v1", "Service")];
    let specs = vec![WatchSpec::new("", "v1", "Service")];
    assert_eq!(filter_gvks(&universe, &specs), universe);
}
