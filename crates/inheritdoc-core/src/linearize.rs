//! C3 linearization of a type's ancestors.
//!
//! The linearization lists the target first, then every ancestor, such that:
//!
//! - Subtypes precede their supertypes
//! - Direct supertypes keep their declared order
//! - The order is consistent with every ancestor's own linearization
//!
//! It is one of the selectable group orders for inherited-method pages
//! (see [`GroupOrder::Linearized`](crate::resolve::GroupOrder::Linearized)).
//!
//! # Example
//!
//! ```
//! use inheritdoc_core::declarations::{Declarations, TypeDecl};
//! use inheritdoc_core::linearize::linearize;
//!
//! let graph = Declarations::new()
//!     .with_type(TypeDecl::interface("A"))
//!     .with_type(TypeDecl::interface("B").extends(["A"]))
//!     .with_type(TypeDecl::interface("C").extends(["A"]))
//!     .with_type(TypeDecl::interface("D").extends(["B", "C"]))
//!     .build_graph()
//!     .unwrap();
//!
//! let order = linearize(&graph, graph.lookup("D").unwrap()).unwrap();
//! let names: Vec<&str> = order.iter().map(|&id| graph.name(id)).collect();
//! assert_eq!(names, vec!["D", "B", "C", "A"]);
//! ```

use std::collections::HashMap;

use crate::ancestors::ancestors_of;
use crate::error::{HierarchyError, HierarchyResult};
use crate::graph::TypeGraph;
use crate::types::TypeId;

/// Compute the C3 linearization of `target` (target first).
///
/// Fails with [`HierarchyError::GraphCycle`] on a reachable cycle and with
/// [`HierarchyError::InconsistentHierarchy`] when the supertype orders
/// cannot be merged.
pub fn linearize(graph: &TypeGraph, target: TypeId) -> HierarchyResult<Vec<TypeId>> {
    // Proves the reachable subgraph acyclic, so the recursion below terminates.
    ancestors_of(graph, target)?;
    let mut memo = HashMap::new();
    linearize_memo(graph, target, &mut memo)
}

fn linearize_memo(
    graph: &TypeGraph,
    id: TypeId,
    memo: &mut HashMap<TypeId, Vec<TypeId>>,
) -> HierarchyResult<Vec<TypeId>> {
    if let Some(cached) = memo.get(&id) {
        return Ok(cached.clone());
    }

    let supertypes = graph.direct_supertypes_of(id);
    let mut seqs: Vec<Vec<TypeId>> = Vec::with_capacity(supertypes.len() + 1);
    for &parent in supertypes {
        seqs.push(linearize_memo(graph, parent, memo)?);
    }
    seqs.push(supertypes.to_vec());

    let mut result = vec![id];
    let merged = merge(&mut seqs).ok_or_else(|| HierarchyError::InconsistentHierarchy {
        type_name: graph.name(id).to_string(),
    })?;
    result.extend(merged);

    memo.insert(id, result.clone());
    Ok(result)
}

/// C3 merge: repeatedly take the first head that appears in no tail.
fn merge(seqs: &mut Vec<Vec<TypeId>>) -> Option<Vec<TypeId>> {
    let mut result = Vec::new();

    loop {
        seqs.retain(|seq| !seq.is_empty());
        if seqs.is_empty() {
            return Some(result);
        }

        let candidate = seqs.iter().map(|seq| seq[0]).find(|head| {
            !seqs
                .iter()
                .any(|seq| seq.len() > 1 && seq[1..].contains(head))
        })?;

        result.push(candidate);
        for seq in seqs.iter_mut() {
            if seq.first() == Some(&candidate) {
                seq.remove(0);
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
