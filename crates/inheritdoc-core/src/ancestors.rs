//! Ancestor collection: every type a target inherits from, once each.
//!
//! [`ancestors_of`] walks the supertype edges depth-first from the target,
//! visiting direct supertypes in declaration order. An ancestor reachable by
//! several paths (a diamond) is recorded the first time it is seen and never
//! again, so the result is a stable pre-order of distinct types.
//!
//! The walk keeps a three-state mark per node. Reaching a node that is still
//! on the current path means the hierarchy has a cycle, which is reported as
//! [`HierarchyError::GraphCycle`] instead of looping.

use std::collections::{BTreeMap, HashMap, VecDeque};

use crate::error::{HierarchyError, HierarchyResult};
use crate::graph::TypeGraph;
use crate::types::{MethodSignature, TypeId};

// ============================================================================
// Traversal
// ============================================================================

/// Per-node traversal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Mark {
    Unvisited,
    /// On the current DFS path.
    OnPath,
    Done,
}

/// Iterative pre-order DFS from `root` over supertype edges.
///
/// Returns newly discovered nodes in pre-order, `root` excluded. Nodes
/// already `Done` in `marks` are skipped, which lets callers share `marks`
/// across several roots.
pub(crate) fn walk_preorder(
    graph: &TypeGraph,
    root: TypeId,
    marks: &mut [Mark],
) -> HierarchyResult<Vec<TypeId>> {
    let mut order = Vec::new();
    // The frame stack doubles as the current path.
    let mut stack: Vec<(TypeId, usize)> = vec![(root, 0)];
    marks[root.index()] = Mark::OnPath;

    while let Some(frame) = stack.last_mut() {
        let (node, next) = *frame;
        let supertypes = graph.direct_supertypes_of(node);
        if next == supertypes.len() {
            marks[node.index()] = Mark::Done;
            stack.pop();
            continue;
        }
        frame.1 += 1;

        let parent = supertypes[next];
        match marks[parent.index()] {
            Mark::Unvisited => {
                marks[parent.index()] = Mark::OnPath;
                order.push(parent);
                stack.push((parent, 0));
            }
            Mark::OnPath => {
                let start = stack
                    .iter()
                    .position(|&(id, _)| id == parent)
                    .unwrap_or(0);
                let path: Vec<TypeId> = stack[start..].iter().map(|&(id, _)| id).collect();
                let cycle = graph.cycle_names(&path);
                tracing::debug!("Inheritance cycle: {}", cycle.join(" -> "));
                return Err(HierarchyError::GraphCycle { cycle });
            }
            Mark::Done => {}
        }
    }

    Ok(order)
}

// ============================================================================
// Ancestors
// ============================================================================

/// One collected ancestor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ancestor {
    /// The ancestor type.
    pub id: TypeId,
    /// Fewest supertype edges from the target to this ancestor (>= 1).
    pub depth: usize,
}

/// All ancestors of a target, deduplicated, in stable pre-order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ancestors {
    target: TypeId,
    entries: Vec<Ancestor>,
    position: HashMap<TypeId, usize>,
}

impl Ancestors {
    /// The type the ancestors were collected for.
    pub fn target(&self) -> TypeId {
        self.target
    }

    /// Ancestors in pre-order.
    pub fn iter(&self) -> impl Iterator<Item = &Ancestor> {
        self.entries.iter()
    }

    /// Ancestor ids in pre-order.
    pub fn ids(&self) -> impl Iterator<Item = TypeId> + '_ {
        self.entries.iter().map(|entry| entry.id)
    }

    /// Number of distinct ancestors.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the target has no supertypes at all.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether `id` is an ancestor of the target.
    pub fn contains(&self, id: TypeId) -> bool {
        self.position.contains_key(&id)
    }

    /// Pre-order position of `id`, if it is an ancestor.
    pub fn position(&self, id: TypeId) -> Option<usize> {
        self.position.get(&id).copied()
    }

    /// Minimal depth of `id`, if it is an ancestor.
    pub fn depth(&self, id: TypeId) -> Option<usize> {
        self.position(id).map(|index| self.entries[index].depth)
    }
}

/// Collect every ancestor of `target`, target excluded.
///
/// Fails with [`HierarchyError::UnknownType`] for an id outside the graph
/// and with [`HierarchyError::GraphCycle`] if a cycle is reachable from
/// `target`.
pub fn ancestors_of(graph: &TypeGraph, target: TypeId) -> HierarchyResult<Ancestors> {
    graph.check(target)?;

    let mut marks = vec![Mark::Unvisited; graph.len()];
    let order = walk_preorder(graph, target, &mut marks)?;
    let depths = min_depths(graph, target);

    let entries: Vec<Ancestor> = order
        .into_iter()
        .map(|id| Ancestor {
            id,
            depth: depths.get(&id).copied().unwrap_or(usize::MAX),
        })
        .collect();
    let position = entries
        .iter()
        .enumerate()
        .map(|(index, entry)| (entry.id, index))
        .collect();

    Ok(Ancestors {
        target,
        entries,
        position,
    })
}

/// Breadth-first edge distance from `target` to each ancestor.
///
/// Only called once the walk has proven the reachable subgraph acyclic.
fn min_depths(graph: &TypeGraph, target: TypeId) -> HashMap<TypeId, usize> {
    let mut depths = HashMap::new();
    let mut queue = VecDeque::from([(target, 0usize)]);
    while let Some((node, depth)) = queue.pop_front() {
        for &parent in graph.direct_supertypes_of(node) {
            if parent != target && !depths.contains_key(&parent) {
                depths.insert(parent, depth + 1);
                queue.push_back((parent, depth + 1));
            }
        }
    }
    depths
}

// ============================================================================
// AncestorSet
// ============================================================================

/// For one target: each inherited signature mapped to the ancestors that
/// declare it, in ancestor pre-order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AncestorSet {
    declarers: BTreeMap<MethodSignature, Vec<TypeId>>,
}

impl AncestorSet {
    /// Declaring ancestors of `signature` (empty if none).
    pub fn declarers_of(&self, signature: &MethodSignature) -> &[TypeId] {
        self.declarers
            .get(signature)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// All `(signature, declarers)` pairs in signature order.
    pub fn iter(&self) -> impl Iterator<Item = (&MethodSignature, &[TypeId])> {
        self.declarers
            .iter()
            .map(|(signature, ids)| (signature, ids.as_slice()))
    }

    /// Number of distinct inherited signatures.
    pub fn len(&self) -> usize {
        self.declarers.len()
    }

    /// Whether no ancestor declares anything.
    pub fn is_empty(&self) -> bool {
        self.declarers.is_empty()
    }
}

/// Build the signature → declarers map for a collected ancestor list.
pub fn collect_declarers(graph: &TypeGraph, ancestors: &Ancestors) -> AncestorSet {
    let mut declarers: BTreeMap<MethodSignature, Vec<TypeId>> = BTreeMap::new();
    for id in ancestors.ids() {
        for signature in graph.declared_signatures(id) {
            declarers.entry(signature.clone()).or_default().push(id);
        }
    }
    AncestorSet { declarers }
}

// ============================================================================
// Tests
// ============================================================================
