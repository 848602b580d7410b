//! Identity types shared by the graph, index, resolver and output modules.

use std::fmt;

use serde::{Deserialize, Serialize};

// ============================================================================
// TypeId
// ============================================================================

/// Dense index of a type registered in a [`TypeGraph`](crate::graph::TypeGraph).
///
/// Ids are assigned in registration order, starting at 0. They are only
/// meaningful for the graph that produced them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct TypeId(pub u32);

impl TypeId {
    /// Create a new TypeId.
    pub fn new(id: u32) -> Self {
        TypeId(id)
    }

    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "type_{}", self.0)
    }
}

// ============================================================================
// TypeKind
// ============================================================================

/// What kind of type a node is.
///
/// The kind never affects resolution; it only selects the wording of the
/// "Methods inherited from ..." heading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TypeKind {
    /// A class (single or multiple inheritance, language dependent).
    Class,
    /// An interface or trait-like type.
    #[default]
    Interface,
}

impl TypeKind {
    /// Lowercase keyword used in rendered headings.
    pub fn as_str(&self) -> &'static str {
        match self {
            TypeKind::Class => "class",
            TypeKind::Interface => "interface",
        }
    }
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// MethodSignature
// ============================================================================

/// A method's identity for inheritance purposes: name plus ordered
/// parameter type descriptors.
///
/// Return types are not part of the identity. The derived
/// ordering (name first, then parameters) is the order methods are listed
/// within one inherited group.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MethodSignature {
    /// Method name.
    pub name: String,
    /// Parameter type descriptors, in declaration order.
    #[serde(default)]
    pub params: Vec<String>,
}

impl MethodSignature {
    /// Create a signature with the given name and parameter types.
    pub fn new<I, S>(name: impl Into<String>, params: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        MethodSignature {
            name: name.into(),
            params: params.into_iter().map(Into::into).collect(),
        }
    }

    /// Create a signature for a method with no parameters.
    pub fn nullary(name: impl Into<String>) -> Self {
        MethodSignature {
            name: name.into(),
            params: Vec::new(),
        }
    }
}

impl fmt::Display for MethodSignature {
    /// Renders as `name(T1, T2)`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name, self.params.join(", "))
    }
}

// ============================================================================
// MethodDecl
// ============================================================================

/// A method as declared on a type: its signature plus an optional return
/// descriptor.
///
/// The return descriptor only matters for conflict detection in the
/// [`SignatureIndex`](crate::signatures::SignatureIndex).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MethodDecl {
    /// Method name.
    pub name: String,
    /// Parameter type descriptors.
    #[serde(default)]
    pub params: Vec<String>,
    /// Return type descriptor, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub returns: Option<String>,
}

impl MethodDecl {
    /// Create a declaration without a return descriptor.
    pub fn new<I, S>(name: impl Into<String>, params: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        MethodDecl {
            name: name.into(),
            params: params.into_iter().map(Into::into).collect(),
            returns: None,
        }
    }

    /// Create a declaration for a method with no parameters.
    pub fn nullary(name: impl Into<String>) -> Self {
        MethodDecl {
            name: name.into(),
            params: Vec::new(),
            returns: None,
        }
    }

    /// Set the return descriptor.
    pub fn with_returns(mut self, returns: impl Into<String>) -> Self {
        self.returns = Some(returns.into());
        self
    }

    /// The identity of this declaration.
    pub fn signature(&self) -> MethodSignature {
        MethodSignature {
            name: self.name.clone(),
            params: self.params.clone(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
