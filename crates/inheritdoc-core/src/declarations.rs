//! Type declarations: the input boundary of the engine.
//!
//! A front end (source parser, doclet, test fixture) describes each type as a
//! [`TypeDecl`]: its qualified name, kind, ordered direct supertypes, and the
//! methods it declares itself. A [`Declarations`] document is the JSON form of
//! a whole set of types:
//!
//! ```json
//! {
//!   "types": [
//!     { "name": "pkg3.I4", "extends": [], "methods": [ { "name": "foo" } ] },
//!     { "name": "pkg3.I3", "extends": ["pkg3.I4"], "methods": [ { "name": "foo" } ] }
//!   ]
//! }
//! ```
//!
//! Types may appear in any order; [`Declarations::build_graph`] uses the
//! two-phase build of [`TypeGraphBuilder::from_declarations`].

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{DocError, HierarchyResult};
use crate::graph::{TypeGraph, TypeGraphBuilder};
use crate::types::{MethodDecl, TypeKind};

// ============================================================================
// TypeDecl
// ============================================================================

/// One type as described by the front end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TypeDecl {
    /// Unique qualified name (e.g. `pkg3.I1`).
    pub name: String,
    /// Class or interface (default: interface).
    #[serde(default)]
    pub kind: TypeKind,
    /// Direct supertypes, in declaration order.
    #[serde(default)]
    pub extends: Vec<String>,
    /// Methods declared directly by this type.
    #[serde(default)]
    pub methods: Vec<MethodDecl>,
}

impl TypeDecl {
    /// Create a declaration with the given name and kind, no supertypes, no methods.
    pub fn new(name: impl Into<String>, kind: TypeKind) -> Self {
        TypeDecl {
            name: name.into(),
            kind,
            extends: Vec::new(),
            methods: Vec::new(),
        }
    }

    /// Create an interface declaration.
    pub fn interface(name: impl Into<String>) -> Self {
        Self::new(name, TypeKind::Interface)
    }

    /// Create a class declaration.
    pub fn class(name: impl Into<String>) -> Self {
        Self::new(name, TypeKind::Class)
    }

    /// Append direct supertypes.
    pub fn extends<I, S>(mut self, supertypes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extends.extend(supertypes.into_iter().map(Into::into));
        self
    }

    /// Append a declared method.
    pub fn with_method(mut self, method: MethodDecl) -> Self {
        self.methods.push(method);
        self
    }
}

// ============================================================================
// Declarations
// ============================================================================

/// A complete set of type declarations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Declarations {
    /// All declared types.
    pub types: Vec<TypeDecl>,
}

impl Declarations {
    /// Create an empty set.
    pub fn new() -> Self {
        Declarations::default()
    }

    /// Append a type declaration.
    pub fn push(&mut self, decl: TypeDecl) {
        self.types.push(decl);
    }

    /// Builder-style [`push`](Self::push).
    pub fn with_type(mut self, decl: TypeDecl) -> Self {
        self.types.push(decl);
        self
    }

    /// Parse a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Read and parse a JSON declarations file.
    pub fn from_path(path: &Path) -> Result<Self, DocError> {
        let content = fs::read_to_string(path).map_err(|e| DocError::io(path, e))?;
        let decls = Self::from_json_str(&content)?;
        tracing::debug!(
            "Loaded {} type declarations from {}",
            decls.types.len(),
            path.display()
        );
        Ok(decls)
    }

    /// Build the frozen type graph (two-phase: names first, then edges).
    pub fn build_graph(&self) -> HierarchyResult<TypeGraph> {
        Ok(TypeGraphBuilder::from_declarations(&self.types)?.build())
    }
}

// ============================================================================
// Tests
// ============================================================================
