//! Signature index: the method signatures each type declares itself.
//!
//! The index answers "which signatures does this exact type declare", never
//! "which does it inherit". Signature identity is name plus parameter types;
//! a return descriptor is kept per entry only so that two declarations that
//! agree on identity but disagree on return type can be reported as a
//! [`HierarchyError::SignatureConflict`].

use std::collections::BTreeMap;

use crate::error::{HierarchyError, HierarchyResult};
use crate::types::{MethodDecl, MethodSignature, TypeId};

/// Signatures declared by one type, with their return descriptors.
type DeclaredMethods = BTreeMap<MethodSignature, Option<String>>;

/// Per-type index of directly declared method signatures.
///
/// Entries are stored densely by [`TypeId`], in registration order.
#[derive(Debug, Clone, Default)]
pub struct SignatureIndex {
    by_type: Vec<DeclaredMethods>,
}

impl SignatureIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        SignatureIndex::default()
    }

    /// Build the entry for one type without inserting it.
    ///
    /// Exact duplicates collapse. A declaration without a return descriptor
    /// never conflicts; one with a descriptor fills in a missing one.
    pub(crate) fn prepare(
        type_name: &str,
        methods: &[MethodDecl],
    ) -> HierarchyResult<DeclaredMethods> {
        let mut entry = DeclaredMethods::new();
        for method in methods {
            let signature = method.signature();
            match entry.get_mut(&signature) {
                None => {
                    entry.insert(signature, method.returns.clone());
                }
                Some(existing) => {
                    if let (Some(first), Some(second)) =
                        (existing.as_deref(), method.returns.as_deref())
                    {
                        if first != second {
                            return Err(HierarchyError::SignatureConflict {
                                type_name: type_name.to_string(),
                                signature: signature.to_string(),
                                first: first.to_string(),
                                second: second.to_string(),
                            });
                        }
                    }
                    if existing.is_none() {
                        existing.clone_from(&method.returns);
                    }
                }
            }
        }
        Ok(entry)
    }

    /// Append a prepared entry. The entry receives the next dense id.
    pub(crate) fn push(&mut self, entry: DeclaredMethods) -> TypeId {
        let id = TypeId::new(self.by_type.len() as u32);
        self.by_type.push(entry);
        id
    }

    /// Signatures declared directly by `id`, in signature order.
    ///
    /// Unknown ids yield nothing.
    pub fn declared_signatures(
        &self,
        id: TypeId,
    ) -> impl Iterator<Item = &MethodSignature> + '_ {
        self.by_type
            .get(id.index())
            .into_iter()
            .flat_map(|entry| entry.keys())
    }

    /// Whether `id` itself declares `signature`.
    pub fn declares(&self, id: TypeId, signature: &MethodSignature) -> bool {
        self.by_type
            .get(id.index())
            .is_some_and(|entry| entry.contains_key(signature))
    }

    /// Return descriptor recorded for `signature` on `id`, if any.
    pub fn return_type_of(&self, id: TypeId, signature: &MethodSignature) -> Option<&str> {
        self.by_type
            .get(id.index())
            .and_then(|entry| entry.get(signature))
            .and_then(|returns| returns.as_deref())
    }

    /// Number of signatures declared directly by `id`.
    pub fn declared_count(&self, id: TypeId) -> usize {
        self.by_type.get(id.index()).map_or(0, BTreeMap::len)
    }

    /// Total number of (type, signature) entries.
    pub fn signature_count(&self) -> usize {
        self.by_type.iter().map(BTreeMap::len).sum()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn index_with(type_name: &str, methods: &[MethodDecl]) -> (SignatureIndex, TypeId) {
        let mut index = SignatureIndex::new();
        let entry = SignatureIndex::prepare(type_name, methods).unwrap();
        let id = index.push(entry);
        (index, id)
    }

    #[test]
    fn declared_signatures_are_sorted_and_deduplicated() {
        let (index, id) = index_with(
            "A",
            &[
                MethodDecl::nullary("foo"),
                MethodDecl::nullary("bar"),
                MethodDecl::nullary("foo"),
            ],
        );
        let names: Vec<String> = index.declared_signatures(id).map(|s| s.to_string()).collect();
        assert_eq!(names, vec!["bar()", "foo()"]);
        assert_eq!(index.declared_count(id), 2);
    }

    #[test]
    fn overloads_are_distinct_signatures() {
        let (index, id) = index_with(
            "A",
            &[MethodDecl::nullary("foo"), MethodDecl::new("foo", ["int"])],
        );
        assert!(index.declares(id, &MethodSignature::nullary("foo")));
        assert!(index.declares(id, &MethodSignature::new("foo", ["int"])));
        assert!(!index.declares(id, &MethodSignature::new("foo", ["long"])));
    }

    #[test]
    fn conflicting_return_types_are_rejected() {
        let err = SignatureIndex::prepare(
            "pkg.A",
            &[
                MethodDecl::nullary("size").with_returns("int"),
                MethodDecl::nullary("size").with_returns("long"),
            ],
        )
        .unwrap_err();
        assert_eq!(
            err,
            HierarchyError::SignatureConflict {
                type_name: "pkg.A".into(),
                signature: "size()".into(),
                first: "int".into(),
                second: "long".into(),
            }
        );
    }

    #[test]
    fn missing_return_type_never_conflicts() {
        let (index, id) = index_with(
            "A",
            &[
                MethodDecl::nullary("size"),
                MethodDecl::nullary("size").with_returns("int"),
                MethodDecl::nullary("size"),
            ],
        );
        assert_eq!(
            index.return_type_of(id, &MethodSignature::nullary("size")),
            Some("int")
        );
    }

    #[test]
    fn unknown_id_declares_nothing() {
        let index = SignatureIndex::new();
        assert_eq!(index.declared_signatures(TypeId::new(7)).count(), 0);
        assert!(!index.declares(TypeId::new(7), &MethodSignature::nullary("foo")));
        assert_eq!(index.signature_count(), 0);
    }
}
