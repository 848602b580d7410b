//! Integration tests for inherited-member resolution under diamond
//! inheritance.
//!
//! The `pkg3` fixture mirrors the classic documentation case:
//!
//! ```text
//!         I4 foo()
//!          |
//! I2 foo() I3 foo()
//!     \   /
//!      I1
//!      |
//!      I0
//! ```
//!
//! `I2` and `I3` declare `foo()` independently, so both are credited. `I3`
//! overrides `I4`, so `I4` is never credited.

use std::path::PathBuf;
use std::sync::Arc;

use inheritdoc::ancestors::ancestors_of;
use inheritdoc::declarations::{Declarations, TypeDecl};
use inheritdoc::error::HierarchyError;
use inheritdoc::graph::TypeGraph;
use inheritdoc::output::render_text;
use inheritdoc::resolve::{resolve_inherited, GroupOrder, Resolution, Resolver};
use inheritdoc::types::{MethodDecl, MethodSignature};

fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/pkg3.json")
}

fn pkg3() -> TypeGraph {
    Declarations::from_path(&fixture_path())
        .unwrap()
        .build_graph()
        .unwrap()
}

fn resolve(graph: &TypeGraph, name: &str) -> Resolution {
    resolve_inherited(graph, graph.lookup(name).unwrap()).unwrap()
}

fn credited_names(graph: &TypeGraph, resolution: &Resolution, sig: &str) -> Vec<String> {
    resolution
        .credited_for(&MethodSignature::nullary(sig))
        .into_iter()
        .map(|id| graph.name(id).to_string())
        .collect()
}

mod diamond_siblings {
    use super::*;

    #[test]
    fn i1_credits_both_siblings() {
        let graph = pkg3();
        let resolution = resolve(&graph, "pkg3.I1");
        assert_eq!(
            credited_names(&graph, &resolution, "foo"),
            vec!["pkg3.I2", "pkg3.I3"]
        );
    }

    #[test]
    fn i0_credits_both_siblings_transitively() {
        let graph = pkg3();
        let resolution = resolve(&graph, "pkg3.I0");
        assert_eq!(
            credited_names(&graph, &resolution, "foo"),
            vec!["pkg3.I2", "pkg3.I3"]
        );
    }

    #[test]
    fn text_rendering_matches_page_headings() {
        let graph = pkg3();
        let resolution = resolve(&graph, "pkg3.I1");
        assert_eq!(
            render_text(&graph, &resolution),
            "Methods inherited from interface pkg3.I2: foo()\n\
             Methods inherited from interface pkg3.I3: foo()\n"
        );
    }
}

mod override_suppression {
    use super::*;

    #[test]
    fn overridden_ancestor_is_absent() {
        let graph = pkg3();
        let i4 = graph.lookup("pkg3.I4").unwrap();
        for page in ["pkg3.I0", "pkg3.I1"] {
            let resolution = resolve(&graph, page);
            assert!(resolution.group_for(i4).is_none(), "I4 credited on {page}");
        }
    }

    #[test]
    fn overridden_ancestor_keeps_its_other_methods() {
        // I4 also declares bar(int); only foo() is overridden by I3.
        let graph = Declarations::new()
            .with_type(
                TypeDecl::interface("I4")
                    .with_method(MethodDecl::nullary("foo"))
                    .with_method(MethodDecl::new("bar", ["int"])),
            )
            .with_type(
                TypeDecl::interface("I3")
                    .extends(["I4"])
                    .with_method(MethodDecl::nullary("foo")),
            )
            .with_type(TypeDecl::interface("I1").extends(["I3"]))
            .build_graph()
            .unwrap();

        let resolution = resolve(&graph, "I1");
        let i4 = graph.lookup("I4").unwrap();
        assert_eq!(
            resolution.group_for(i4).unwrap().signatures,
            vec![MethodSignature::new("bar", ["int"])]
        );
        assert_eq!(credited_names(&graph, &resolution, "foo"), vec!["I3"]);
    }

    #[test]
    fn chain_credits_only_most_specific() {
        let graph = Declarations::new()
            .with_type(TypeDecl::interface("A").with_method(MethodDecl::nullary("m")))
            .with_type(
                TypeDecl::interface("B")
                    .extends(["A"])
                    .with_method(MethodDecl::nullary("m")),
            )
            .with_type(
                TypeDecl::interface("C")
                    .extends(["B"])
                    .with_method(MethodDecl::nullary("m")),
            )
            .with_type(TypeDecl::class("T").extends(["C"]))
            .build_graph()
            .unwrap();

        let resolution = resolve(&graph, "T");
        assert_eq!(resolution.len(), 1);
        assert_eq!(credited_names(&graph, &resolution, "m"), vec!["C"]);
    }
}

#[test]
fn target_is_never_credited() {
    let graph = pkg3();
    let i3 = graph.lookup("pkg3.I3").unwrap();
    let resolution = resolve(&graph, "pkg3.I3");
    assert!(resolution.group_for(i3).is_none());
    // I3's own foo() hides I4's from I3's page.
    assert!(resolution.is_empty());
}

#[test]
fn resolution_is_deterministic() {
    let graph = pkg3();
    let first = resolve(&graph, "pkg3.I0");
    for _ in 0..10 {
        assert_eq!(resolve(&graph, "pkg3.I0"), first);
    }

    let rebuilt = pkg3();
    assert_eq!(resolve(&rebuilt, "pkg3.I0"), first);
}

#[test]
fn diamond_reachable_ancestor_is_collected_once() {
    let graph = Declarations::new()
        .with_type(TypeDecl::interface("A"))
        .with_type(TypeDecl::interface("B").extends(["A"]))
        .with_type(TypeDecl::interface("C").extends(["A"]))
        .with_type(TypeDecl::class("D").extends(["B", "C"]))
        .build_graph()
        .unwrap();

    let ancestors = ancestors_of(&graph, graph.lookup("D").unwrap()).unwrap();
    let names: Vec<&str> = ancestors.ids().map(|id| graph.name(id)).collect();
    assert_eq!(names, vec!["B", "A", "C"]);
}

#[test]
fn cycle_is_rejected_with_path() {
    let graph = Declarations::new()
        .with_type(TypeDecl::interface("A").extends(["B"]))
        .with_type(TypeDecl::interface("B").extends(["C"]))
        .with_type(TypeDecl::interface("C").extends(["A"]))
        .with_type(TypeDecl::class("Outside"))
        .build_graph()
        .unwrap();

    let err = resolve_inherited(&graph, graph.lookup("A").unwrap()).unwrap_err();
    assert_eq!(
        err,
        HierarchyError::GraphCycle {
            cycle: vec!["A".into(), "B".into(), "C".into(), "A".into()]
        }
    );
    assert_eq!(err.to_string(), "inheritance cycle detected: A -> B -> C -> A");

    // Types that cannot reach the cycle still resolve.
    assert!(resolve(&graph, "Outside").is_empty());
}

#[test]
fn group_order_changes_only_the_order() {
    let graph = pkg3();
    let target = graph.lookup("pkg3.I0").unwrap();
    let baseline = resolve_inherited(&graph, target).unwrap();

    for order in GroupOrder::ALL {
        let resolution = Resolver::new(&graph).with_order(order).resolve(target).unwrap();
        assert_eq!(resolution.order, order);
        let mut groups = resolution.groups.clone();
        let mut expected = baseline.groups.clone();
        groups.sort_by_key(|group| group.ancestor);
        expected.sort_by_key(|group| group.ancestor);
        assert_eq!(groups, expected);
    }
}

#[test]
fn concurrent_resolution_matches_sequential() {
    let graph = Arc::new(pkg3());
    let targets: Vec<_> = graph.ids().collect();
    let sequential: Vec<Resolution> = targets
        .iter()
        .map(|&id| resolve_inherited(&graph, id).unwrap())
        .collect();

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let graph = Arc::clone(&graph);
                let targets = &targets;
                scope.spawn(move || {
                    targets
                        .iter()
                        .map(|&id| resolve_inherited(&graph, id).unwrap())
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), sequential);
        }
    });
}
