//! Type graph model: types, their direct-supertype edges, and subtype queries.
//!
//! The graph is built once by a [`TypeGraphBuilder`] (single writer) and then
//! frozen into an immutable [`TypeGraph`] that any number of readers can
//! query concurrently. Nodes are stored densely and edges are [`TypeId`]
//! indices, so the graph owns every node and no edge owns anything.
//!
//! # Building
//!
//! Two registration styles are supported:
//!
//! - **Eager**: [`TypeGraphBuilder::add_type`] resolves supertypes immediately,
//!   so callers must register in dependency order. Cycles cannot be expressed.
//! - **Two-phase**: [`TypeGraphBuilder::from_declarations`] registers every
//!   name first and then resolves edges, so declarations may appear in any
//!   order. Cycles can be expressed and are reported by queries as
//!   [`HierarchyError::GraphCycle`].
//!
//! Either way, a supertype name with no registered type fails with
//! [`HierarchyError::UnknownSupertype`]; edges are never dropped silently.

use std::collections::HashMap;

use crate::ancestors::{walk_preorder, Mark};
use crate::declarations::TypeDecl;
use crate::error::{HierarchyError, HierarchyResult};
use crate::signatures::SignatureIndex;
use crate::types::{MethodSignature, TypeId, TypeKind};

/// A registered type.
#[derive(Debug, Clone)]
struct TypeNode {
    name: String,
    kind: TypeKind,
    /// Direct supertypes, declaration order, duplicates removed.
    supertypes: Vec<TypeId>,
    /// Direct subtypes, registration order. Filled in by `build()`.
    subtypes: Vec<TypeId>,
}

// ============================================================================
// Builder
// ============================================================================

/// Single-writer builder for a [`TypeGraph`].
#[derive(Debug, Default)]
pub struct TypeGraphBuilder {
    nodes: Vec<TypeNode>,
    by_name: HashMap<String, TypeId>,
    signatures: SignatureIndex,
}

impl TypeGraphBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        TypeGraphBuilder::default()
    }

    /// Number of types registered so far.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether no types are registered.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Register a type whose supertypes are all registered already.
    ///
    /// Fails with [`HierarchyError::DuplicateType`] if the name is taken,
    /// [`HierarchyError::UnknownSupertype`] if a supertype is missing, or
    /// [`HierarchyError::SignatureConflict`] if the methods conflict. On
    /// failure the builder is unchanged.
    pub fn add_type(&mut self, decl: &TypeDecl) -> HierarchyResult<TypeId> {
        if self.by_name.contains_key(&decl.name) {
            return Err(HierarchyError::DuplicateType {
                type_name: decl.name.clone(),
            });
        }
        let supertypes = self.resolve_supertypes(decl)?;
        let id = self.register(decl)?;
        self.nodes[id.index()].supertypes = supertypes;
        Ok(id)
    }

    /// Two-phase build from declarations in any order.
    ///
    /// Phase one registers every name (and its signatures); phase two
    /// resolves the supertype edges. Any error aborts the whole build.
    pub fn from_declarations<'a, I>(decls: I) -> HierarchyResult<Self>
    where
        I: IntoIterator<Item = &'a TypeDecl>,
    {
        let decls: Vec<&TypeDecl> = decls.into_iter().collect();
        let mut builder = TypeGraphBuilder::new();

        for decl in &decls {
            builder.register(decl)?;
        }

        for (index, decl) in decls.iter().enumerate() {
            let supertypes = builder.resolve_supertypes(decl)?;
            builder.nodes[index].supertypes = supertypes;
        }

        tracing::debug!("Registered {} types in two phases", builder.nodes.len());
        Ok(builder)
    }

    /// Freeze the builder into an immutable graph.
    pub fn build(mut self) -> TypeGraph {
        let edges: Vec<(TypeId, TypeId)> = self
            .nodes
            .iter()
            .enumerate()
            .flat_map(|(index, node)| {
                let child = TypeId::new(index as u32);
                node.supertypes.iter().map(move |&parent| (child, parent))
            })
            .collect();
        for (child, parent) in edges {
            self.nodes[parent.index()].subtypes.push(child);
        }

        TypeGraph {
            nodes: self.nodes,
            by_name: self.by_name,
            signatures: self.signatures,
        }
    }

    /// Add a node with no edges. Signatures are validated before anything
    /// is inserted, so a failure leaves the builder untouched.
    fn register(&mut self, decl: &TypeDecl) -> HierarchyResult<TypeId> {
        if self.by_name.contains_key(&decl.name) {
            return Err(HierarchyError::DuplicateType {
                type_name: decl.name.clone(),
            });
        }
        let entry = SignatureIndex::prepare(&decl.name, &decl.methods)?;
        let id = self.signatures.push(entry);
        debug_assert_eq!(id.index(), self.nodes.len());

        self.nodes.push(TypeNode {
            name: decl.name.clone(),
            kind: decl.kind,
            supertypes: Vec::new(),
            subtypes: Vec::new(),
        });
        self.by_name.insert(decl.name.clone(), id);
        Ok(id)
    }

    fn resolve_supertypes(&self, decl: &TypeDecl) -> HierarchyResult<Vec<TypeId>> {
        let mut supertypes: Vec<TypeId> = Vec::with_capacity(decl.extends.len());
        for name in &decl.extends {
            let id = self
                .by_name
                .get(name)
                .copied()
                .ok_or_else(|| HierarchyError::UnknownSupertype {
                    type_name: decl.name.clone(),
                    supertype: name.clone(),
                })?;
            if !supertypes.contains(&id) {
                supertypes.push(id);
            }
        }
        Ok(supertypes)
    }
}

// ============================================================================
// Frozen Graph
// ============================================================================

/// Immutable type graph shared by all resolution queries.
///
/// Accessors that take a [`TypeId`] index the graph directly and panic on an
/// id from another graph, the same contract as slice indexing. Query entry
/// points ([`ancestors_of`](crate::ancestors::ancestors_of),
/// [`Resolver::resolve`](crate::resolve::Resolver::resolve)) validate ids
/// with [`TypeGraph::check`] first.
#[derive(Debug, Clone)]
pub struct TypeGraph {
    nodes: Vec<TypeNode>,
    by_name: HashMap<String, TypeId>,
    signatures: SignatureIndex,
}

impl TypeGraph {
    /// Start building a graph.
    pub fn builder() -> TypeGraphBuilder {
        TypeGraphBuilder::new()
    }

    /// Number of types.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the graph has no types.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All ids, in registration order.
    pub fn ids(&self) -> impl Iterator<Item = TypeId> + '_ {
        (0..self.nodes.len()).map(|index| TypeId::new(index as u32))
    }

    /// Find a type by qualified name.
    pub fn lookup(&self, name: &str) -> Option<TypeId> {
        self.by_name.get(name).copied()
    }

    /// Find a type by name or fail with [`HierarchyError::UnknownType`].
    pub fn require(&self, name: &str) -> HierarchyResult<TypeId> {
        self.lookup(name).ok_or_else(|| HierarchyError::UnknownType {
            type_name: name.to_string(),
        })
    }

    /// Whether `id` belongs to this graph.
    pub fn contains(&self, id: TypeId) -> bool {
        id.index() < self.nodes.len()
    }

    /// Fail with [`HierarchyError::UnknownType`] if `id` is not in this graph.
    pub fn check(&self, id: TypeId) -> HierarchyResult<()> {
        if self.contains(id) {
            Ok(())
        } else {
            Err(HierarchyError::UnknownType {
                type_name: id.to_string(),
            })
        }
    }

    /// Qualified name of a type.
    pub fn name(&self, id: TypeId) -> &str {
        &self.nodes[id.index()].name
    }

    /// Kind of a type.
    pub fn kind(&self, id: TypeId) -> TypeKind {
        self.nodes[id.index()].kind
    }

    /// Direct supertypes, in declaration order.
    pub fn direct_supertypes_of(&self, id: TypeId) -> &[TypeId] {
        &self.nodes[id.index()].supertypes
    }

    /// Direct subtypes, in registration order.
    pub fn direct_subtypes_of(&self, id: TypeId) -> &[TypeId] {
        &self.nodes[id.index()].subtypes
    }

    /// The signature index for all types.
    pub fn signatures(&self) -> &SignatureIndex {
        &self.signatures
    }

    /// Signatures declared directly by `id` (not inherited).
    pub fn declared_signatures(&self, id: TypeId) -> impl Iterator<Item = &MethodSignature> + '_ {
        self.signatures.declared_signatures(id)
    }

    /// Whether `a` reaches `b` through one or more supertype edges.
    ///
    /// Irreflexive unless `a` sits on a cycle through itself. Terminates on
    /// any graph, cyclic or not.
    pub fn is_descendant_of(&self, a: TypeId, b: TypeId) -> bool {
        if !self.contains(a) || !self.contains(b) {
            return false;
        }
        let mut seen = vec![false; self.nodes.len()];
        let mut stack: Vec<TypeId> = self.direct_supertypes_of(a).to_vec();
        while let Some(current) = stack.pop() {
            if current == b {
                return true;
            }
            if seen[current.index()] {
                continue;
            }
            seen[current.index()] = true;
            stack.extend_from_slice(self.direct_supertypes_of(current));
        }
        false
    }

    /// Validate the whole graph is acyclic.
    ///
    /// Roots are tried in registration order, so the reported cycle is
    /// deterministic.
    pub fn check_acyclic(&self) -> HierarchyResult<()> {
        let mut marks = vec![Mark::Unvisited; self.nodes.len()];
        for id in self.ids() {
            if marks[id.index()] == Mark::Unvisited {
                walk_preorder(self, id, &mut marks)?;
            }
        }
        Ok(())
    }

    /// Names for a cycle path, closing it by repeating the first entry.
    pub(crate) fn cycle_names(&self, path: &[TypeId]) -> Vec<String> {
        let mut names: Vec<String> = path.iter().map(|&id| self.name(id).to_string()).collect();
        if let Some(&first) = path.first() {
            names.push(self.name(first).to_string());
        }
        names
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MethodDecl;

    /// Classic diamond:
    ///     A
    ///    / \
    ///   B   C
    ///    \ /
    ///     D
    fn diamond() -> TypeGraph {
        let mut builder = TypeGraph::builder();
        builder.add_type(&TypeDecl::interface("A")).unwrap();
        builder.add_type(&TypeDecl::interface("B").extends(["A"])).unwrap();
        builder.add_type(&TypeDecl::interface("C").extends(["A"])).unwrap();
        builder
            .add_type(&TypeDecl::interface("D").extends(["B", "C"]))
            .unwrap();
        builder.build()
    }

    fn id(graph: &TypeGraph, name: &str) -> TypeId {
        graph.lookup(name).unwrap()
    }

    #[test]
    fn add_type_assigns_dense_ids_in_order() {
        let graph = diamond();
        assert_eq!(graph.len(), 4);
        let names: Vec<&str> = graph.ids().map(|id| graph.name(id)).collect();
        assert_eq!(names, vec!["A", "B", "C", "D"]);
    }

    #[test]
    fn direct_supertypes_keep_declaration_order() {
        let graph = diamond();
        let d = id(&graph, "D");
        assert_eq!(
            graph.direct_supertypes_of(d),
            &[id(&graph, "B"), id(&graph, "C")]
        );
    }

    #[test]
    fn direct_subtypes_are_reverse_edges() {
        let graph = diamond();
        let a = id(&graph, "A");
        assert_eq!(
            graph.direct_subtypes_of(a),
            &[id(&graph, "B"), id(&graph, "C")]
        );
        assert!(graph.direct_subtypes_of(id(&graph, "D")).is_empty());
    }

    #[test]
    fn add_type_rejects_unregistered_supertype() {
        let mut builder = TypeGraph::builder();
        let err = builder
            .add_type(&TypeDecl::interface("B").extends(["A"]))
            .unwrap_err();
        assert_eq!(
            err,
            HierarchyError::UnknownSupertype {
                type_name: "B".into(),
                supertype: "A".into(),
            }
        );
        assert!(builder.is_empty());
    }

    #[test]
    fn add_type_rejects_duplicates() {
        let mut builder = TypeGraph::builder();
        builder.add_type(&TypeDecl::interface("A")).unwrap();
        let err = builder.add_type(&TypeDecl::class("A")).unwrap_err();
        assert_eq!(
            err,
            HierarchyError::DuplicateType {
                type_name: "A".into()
            }
        );
        assert_eq!(builder.len(), 1);
    }

    #[test]
    fn add_type_leaves_builder_unchanged_on_signature_conflict() {
        let mut builder = TypeGraph::builder();
        let decl = TypeDecl::interface("A")
            .with_method(MethodDecl::nullary("foo").with_returns("int"))
            .with_method(MethodDecl::nullary("foo").with_returns("void"));
        assert!(matches!(
            builder.add_type(&decl),
            Err(HierarchyError::SignatureConflict { .. })
        ));
        assert!(builder.is_empty());
        assert_eq!(builder.build().signatures().signature_count(), 0);
    }

    #[test]
    fn two_phase_build_fails_on_dangling_reference() {
        let decls = vec![
            TypeDecl::interface("A").extends(["Missing"]),
            TypeDecl::interface("B"),
        ];
        let err = TypeGraphBuilder::from_declarations(&decls).unwrap_err();
        assert_eq!(
            err,
            HierarchyError::UnknownSupertype {
                type_name: "A".into(),
                supertype: "Missing".into(),
            }
        );
    }

    #[test]
    fn duplicate_supertype_edges_collapse() {
        let decls = vec![
            TypeDecl::interface("A"),
            TypeDecl::interface("B").extends(["A", "A"]),
        ];
        let graph = TypeGraphBuilder::from_declarations(&decls).unwrap().build();
        assert_eq!(graph.direct_supertypes_of(id(&graph, "B")).len(), 1);
    }

    #[test]
    fn is_descendant_of_is_transitive_and_irreflexive() {
        let graph = diamond();
        let (a, b, c, d) = (id(&graph, "A"), id(&graph, "B"), id(&graph, "C"), id(&graph, "D"));
        assert!(graph.is_descendant_of(d, a));
        assert!(graph.is_descendant_of(d, b));
        assert!(graph.is_descendant_of(b, a));
        assert!(!graph.is_descendant_of(a, d));
        assert!(!graph.is_descendant_of(b, c));
        assert!(!graph.is_descendant_of(a, a));
        assert!(!graph.is_descendant_of(d, d));
    }

    #[test]
    fn is_descendant_of_terminates_on_cycles() {
        let decls = vec![
            TypeDecl::interface("A").extends(["B"]),
            TypeDecl::interface("B").extends(["A"]),
            TypeDecl::interface("C"),
        ];
        let graph = TypeGraphBuilder::from_declarations(&decls).unwrap().build();
        assert!(graph.is_descendant_of(id(&graph, "A"), id(&graph, "B")));
        assert!(!graph.is_descendant_of(id(&graph, "A"), id(&graph, "C")));
    }

    #[test]
    fn check_acyclic_accepts_diamond() {
        assert!(diamond().check_acyclic().is_ok());
    }

    #[test]
    fn check_acyclic_names_the_cycle() {
        let decls = vec![
            TypeDecl::interface("Root").extends(["A"]),
            TypeDecl::interface("A").extends(["B"]),
            TypeDecl::interface("B").extends(["C"]),
            TypeDecl::interface("C").extends(["A"]),
        ];
        let graph = TypeGraphBuilder::from_declarations(&decls).unwrap().build();
        let err = graph.check_acyclic().unwrap_err();
        assert_eq!(
            err,
            HierarchyError::GraphCycle {
                cycle: vec!["A".into(), "B".into(), "C".into(), "A".into()],
            }
        );
    }

    #[test]
    fn require_and_check_report_unknown_types() {
        let graph = diamond();
        assert!(matches!(
            graph.require("Nope"),
            Err(HierarchyError::UnknownType { .. })
        ));
        assert!(graph.check(TypeId::new(99)).is_err());
        assert!(graph.check(id(&graph, "A")).is_ok());
    }

    #[test]
    fn graph_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<TypeGraph>();
    }
}
