//! Override resolution: which ancestors a type page credits for each
//! inherited method.
//!
//! # Algorithm
//!
//! For a target `t` with ancestors `A` (see [`ancestors_of`]):
//!
//! 1. `D(s)`: the ancestors in `A` that declare signature `s` themselves.
//! 2. `C(s)`: the maximal elements of `D(s)`. A declarer `a` is dropped iff
//!    another declarer `b` is a strict descendant of `a`, i.e. `b` overrides
//!    `a`'s declaration. Declarers that are incomparable are all kept, so a
//!    method declared independently by two sibling interfaces is shown under
//!    both.
//! 3. Every ancestor credited with at least one signature becomes one
//!    [`ResolvedGroup`]; groups are ordered by the configured [`GroupOrder`]
//!    and the signatures inside a group are sorted.
//!
//! Signatures declared by `t` itself never show up: `A` excludes `t`, and
//! since `t` is a strict descendant of every ancestor, its own declaration
//! of `s` suppresses all of `D(s)`. Ancestors credited with nothing are
//! absent rather than empty.
//!
//! Resolution is a pure function of the graph, the target and the order. It
//! keeps only call-local bookkeeping, so one [`TypeGraph`] can serve many
//! concurrent resolutions.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ancestors::{ancestors_of, collect_declarers, Ancestors};
use crate::error::HierarchyResult;
use crate::graph::TypeGraph;
use crate::linearize::linearize;
use crate::types::{MethodSignature, TypeId};

// ============================================================================
// Group Order
// ============================================================================

/// Display order of inherited groups on a page.
///
/// The order never changes which groups exist or what they contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GroupOrder {
    /// Stable pre-order from the target, first-declared edge first.
    #[default]
    Preorder,
    /// Nearest ancestors first (fewest edges), ties by pre-order.
    BreadthFirst,
    /// C3 linearization order, falling back to pre-order when the hierarchy
    /// has no consistent linearization.
    Linearized,
}

impl GroupOrder {
    /// All orders, for help text.
    pub const ALL: [GroupOrder; 3] = [
        GroupOrder::Preorder,
        GroupOrder::BreadthFirst,
        GroupOrder::Linearized,
    ];

    /// Stable name used in config, flags and JSON.
    pub fn as_str(&self) -> &'static str {
        match self {
            GroupOrder::Preorder => "preorder",
            GroupOrder::BreadthFirst => "breadth-first",
            GroupOrder::Linearized => "linearized",
        }
    }
}

impl fmt::Display for GroupOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GroupOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GroupOrder::ALL
            .into_iter()
            .find(|order| order.as_str() == s)
            .ok_or_else(|| {
                let valid: Vec<&str> = GroupOrder::ALL.iter().map(GroupOrder::as_str).collect();
                format!("invalid group order '{}', expected one of: {}", s, valid.join(", "))
            })
    }
}

// ============================================================================
// Resolution Output
// ============================================================================

/// One credited ancestor and the signatures attributed to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedGroup {
    /// The credited ancestor.
    pub ancestor: TypeId,
    /// Signatures credited to it, sorted. Never empty.
    pub signatures: Vec<MethodSignature>,
}

/// The inherited-method groups for one target, in display order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// The type whose page this is.
    pub target: TypeId,
    /// The order the groups are in.
    pub order: GroupOrder,
    /// Groups, in display order.
    pub groups: Vec<ResolvedGroup>,
}

impl Resolution {
    /// The group for `ancestor`, if it is credited with anything.
    pub fn group_for(&self, ancestor: TypeId) -> Option<&ResolvedGroup> {
        self.groups.iter().find(|group| group.ancestor == ancestor)
    }

    /// Ancestors credited for `signature`, in display order.
    pub fn credited_for(&self, signature: &MethodSignature) -> Vec<TypeId> {
        self.groups
            .iter()
            .filter(|group| group.signatures.contains(signature))
            .map(|group| group.ancestor)
            .collect()
    }

    /// Number of groups.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Whether nothing is inherited.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

// ============================================================================
// Resolver
// ============================================================================

/// Resolves inherited-method groups against a frozen graph.
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'g> {
    graph: &'g TypeGraph,
    order: GroupOrder,
}

impl<'g> Resolver<'g> {
    /// Create a resolver using [`GroupOrder::Preorder`].
    pub fn new(graph: &'g TypeGraph) -> Self {
        Resolver {
            graph,
            order: GroupOrder::default(),
        }
    }

    /// Set the group order.
    pub fn with_order(mut self, order: GroupOrder) -> Self {
        self.order = order;
        self
    }

    /// Resolve the inherited-method groups for `target`.
    ///
    /// Fails with [`HierarchyError::UnknownType`](crate::error::HierarchyError::UnknownType)
    /// or [`HierarchyError::GraphCycle`](crate::error::HierarchyError::GraphCycle);
    /// no partial result is returned.
    pub fn resolve(&self, target: TypeId) -> HierarchyResult<Resolution> {
        let graph = self.graph;
        let ancestors = ancestors_of(graph, target)?;
        let declarers = collect_declarers(graph, &ancestors);

        let mut reach = Reachability::new(graph);
        let mut credited: HashMap<TypeId, BTreeSet<MethodSignature>> = HashMap::new();

        for (signature, candidates) in declarers.iter() {
            // The target's own declaration overrides every ancestor's.
            if graph.signatures().declares(target, signature) {
                continue;
            }
            for ancestor in maximal_declarers(&mut reach, candidates) {
                credited
                    .entry(ancestor)
                    .or_default()
                    .insert(signature.clone());
            }
        }

        let rank = self.rank(&ancestors);
        let mut ranked: BTreeMap<usize, ResolvedGroup> = BTreeMap::new();
        for (ancestor, signatures) in credited {
            let key = rank.get(&ancestor).copied().unwrap_or(usize::MAX);
            ranked.insert(
                key,
                ResolvedGroup {
                    ancestor,
                    signatures: signatures.into_iter().collect(),
                },
            );
        }
        let groups: Vec<ResolvedGroup> = ranked.into_values().collect();

        tracing::debug!(
            "Resolved {}: {} ancestors, {} inherited signatures, {} groups ({})",
            graph.name(target),
            ancestors.len(),
            declarers.len(),
            groups.len(),
            self.order
        );

        Ok(Resolution {
            target,
            order: self.order,
            groups,
        })
    }

    /// Display rank of every ancestor under the configured order.
    fn rank(&self, ancestors: &Ancestors) -> HashMap<TypeId, usize> {
        match self.order {
            GroupOrder::Preorder => preorder_rank(ancestors),
            GroupOrder::BreadthFirst => {
                let mut entries: Vec<(usize, usize, TypeId)> = ancestors
                    .iter()
                    .enumerate()
                    .map(|(position, entry)| (entry.depth, position, entry.id))
                    .collect();
                entries.sort_unstable();
                entries
                    .into_iter()
                    .enumerate()
                    .map(|(rank, (_, _, id))| (id, rank))
                    .collect()
            }
            GroupOrder::Linearized => match linearize(self.graph, ancestors.target()) {
                Ok(order) => order
                    .into_iter()
                    .skip(1)
                    .enumerate()
                    .map(|(rank, id)| (id, rank))
                    .collect(),
                Err(err) => {
                    tracing::warn!("{}; falling back to preorder group order", err);
                    preorder_rank(ancestors)
                }
            },
        }
    }
}

/// Resolve `target` with the default pre-order group order.
pub fn resolve_inherited(graph: &TypeGraph, target: TypeId) -> HierarchyResult<Resolution> {
    Resolver::new(graph).resolve(target)
}

fn preorder_rank(ancestors: &Ancestors) -> HashMap<TypeId, usize> {
    ancestors
        .ids()
        .enumerate()
        .map(|(rank, id)| (id, rank))
        .collect()
}

/// Maximal elements of `candidates` under the strict-descendant order.
///
/// Keeps the input order. A candidate is dropped iff another candidate is a
/// strict descendant of it.
fn maximal_declarers(reach: &mut Reachability<'_>, candidates: &[TypeId]) -> Vec<TypeId> {
    if candidates.len() == 1 {
        return candidates.to_vec();
    }
    candidates
        .iter()
        .copied()
        .filter(|&a| {
            let overridden = candidates
                .iter()
                .any(|&b| b != a && reach.is_strict_descendant(b, a));
            if overridden {
                tracing::trace!("Suppressed overridden declaration in {}", reach.graph.name(a));
            }
            !overridden
        })
        .collect()
}

/// Call-local memo of each declarer's full ancestor set.
struct Reachability<'g> {
    graph: &'g TypeGraph,
    supertypes: HashMap<TypeId, HashSet<TypeId>>,
}

impl<'g> Reachability<'g> {
    fn new(graph: &'g TypeGraph) -> Self {
        Reachability {
            graph,
            supertypes: HashMap::new(),
        }
    }

    /// Whether `b` is a strict descendant of `a`.
    fn is_strict_descendant(&mut self, b: TypeId, a: TypeId) -> bool {
        let graph = self.graph;
        self.supertypes
            .entry(b)
            .or_insert_with(|| all_supertypes(graph, b))
            .contains(&a)
    }
}

/// Every type reachable from `id` by one or more supertype edges.
fn all_supertypes(graph: &TypeGraph, id: TypeId) -> HashSet<TypeId> {
    let mut seen = HashSet::new();
    let mut stack: Vec<TypeId> = graph.direct_supertypes_of(id).to_vec();
    while let Some(current) = stack.pop() {
        if seen.insert(current) {
            stack.extend_from_slice(graph.direct_supertypes_of(current));
        }
    }
    seen
}

// ============================================================================
// Tests
// ============================================================================
