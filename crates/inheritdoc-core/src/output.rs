//! JSON output types and text rendering for CLI responses.
//!
//! This is the output boundary: a [`Resolution`] becomes an ordered list of
//! [`GroupInfo`] (`ancestor`, `methods`) pairs that a page renderer consumes
//! as-is. Suppressed ancestors are simply not in the list.
//!
//! ## Design Principles
//!
//! 1. **Status first:** every response has `status` as its first field
//! 2. **Deterministic:** same graph and target produce byte-identical output
//! 3. **Versioned:** `schema_version` lets consumers detect format changes

use std::io::{self, Write};

use serde::{Deserialize, Serialize};

use crate::ancestors::Ancestors;
use crate::error::{DocError, OutputErrorCode};
use crate::graph::TypeGraph;
use crate::resolve::{GroupOrder, Resolution, ResolvedGroup};
use crate::types::TypeKind;

/// Current schema version for all responses.
pub const SCHEMA_VERSION: &str = "1";

// ============================================================================
// Group Output
// ============================================================================

/// One "Methods inherited from ..." group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupInfo {
    /// Qualified name of the credited ancestor.
    pub ancestor: String,
    /// Kind of the credited ancestor.
    pub kind: TypeKind,
    /// Rendered signatures, sorted.
    pub methods: Vec<String>,
}

impl GroupInfo {
    /// Convert a resolved group using names from `graph`.
    pub fn from_group(graph: &TypeGraph, group: &ResolvedGroup) -> Self {
        GroupInfo {
            ancestor: graph.name(group.ancestor).to_string(),
            kind: graph.kind(group.ancestor),
            methods: group.signatures.iter().map(ToString::to_string).collect(),
        }
    }

    /// Section heading, e.g. `Methods inherited from interface pkg3.I2`.
    pub fn heading(&self) -> String {
        format!("Methods inherited from {} {}", self.kind, self.ancestor)
    }
}

/// Convert a resolution into display-ordered groups.
pub fn inherited_groups(graph: &TypeGraph, resolution: &Resolution) -> Vec<GroupInfo> {
    resolution
        .groups
        .iter()
        .map(|group| GroupInfo::from_group(graph, group))
        .collect()
}

/// Render a resolution as plain text, one line per group.
///
/// `Methods inherited from interface pkg3.I2: foo()`
pub fn render_text(graph: &TypeGraph, resolution: &Resolution) -> String {
    let mut out = String::new();
    for group in inherited_groups(graph, resolution) {
        out.push_str(&group.heading());
        out.push_str(": ");
        out.push_str(&group.methods.join(", "));
        out.push('\n');
    }
    out
}

// ============================================================================
// Responses
// ============================================================================

/// Response for `resolve`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolveResponse {
    /// Status: "ok".
    pub status: String,
    /// Schema version for compatibility.
    pub schema_version: String,
    /// Qualified name of the page's type.
    pub target: String,
    /// Group order used.
    pub order: GroupOrder,
    /// Inherited groups, in display order.
    pub groups: Vec<GroupInfo>,
}

impl ResolveResponse {
    /// Create from a resolution.
    pub fn new(graph: &TypeGraph, resolution: &Resolution) -> Self {
        ResolveResponse {
            status: "ok".to_string(),
            schema_version: SCHEMA_VERSION.to_string(),
            target: graph.name(resolution.target).to_string(),
            order: resolution.order,
            groups: inherited_groups(graph, resolution),
        }
    }
}

/// One collected ancestor for `ancestors`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AncestorInfo {
    /// Qualified name.
    pub name: String,
    /// Class or interface.
    pub kind: TypeKind,
    /// Fewest supertype edges from the target.
    pub depth: usize,
}

/// Response for `ancestors`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AncestorsResponse {
    /// Status: "ok".
    pub status: String,
    /// Schema version for compatibility.
    pub schema_version: String,
    /// Qualified name of the queried type.
    pub target: String,
    /// Ancestors in pre-order.
    pub ancestors: Vec<AncestorInfo>,
}

impl AncestorsResponse {
    /// Create from collected ancestors.
    pub fn new(graph: &TypeGraph, ancestors: &Ancestors) -> Self {
        AncestorsResponse {
            status: "ok".to_string(),
            schema_version: SCHEMA_VERSION.to_string(),
            target: graph.name(ancestors.target()).to_string(),
            ancestors: ancestors
                .iter()
                .map(|entry| AncestorInfo {
                    name: graph.name(entry.id).to_string(),
                    kind: graph.kind(entry.id),
                    depth: entry.depth,
                })
                .collect(),
        }
    }
}

/// Response for `check`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckResponse {
    /// Status: "ok".
    pub status: String,
    /// Schema version for compatibility.
    pub schema_version: String,
    /// Number of types in the graph.
    pub types: usize,
    /// Number of (type, signature) declarations.
    pub signatures: usize,
}

impl CheckResponse {
    /// Create from a validated graph.
    pub fn new(graph: &TypeGraph) -> Self {
        CheckResponse {
            status: "ok".to_string(),
            schema_version: SCHEMA_VERSION.to_string(),
            types: graph.len(),
            signatures: graph.signatures().signature_count(),
        }
    }
}

// ============================================================================
// Error Output
// ============================================================================

/// Error details for JSON output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Numeric error code.
    pub code: u8,
    /// Human-readable message.
    pub message: String,
    /// Error-specific structured data.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorInfo {
    /// Create from a DocError.
    pub fn from_error(err: &DocError) -> Self {
        use crate::error::HierarchyError;

        let code = OutputErrorCode::from(err).code();
        let message = err.to_string();

        let details = match err {
            DocError::InvalidArguments { details, .. } => details.clone(),
            DocError::FileNotFound { path } => Some(serde_json::json!({ "path": path })),
            DocError::Hierarchy(HierarchyError::GraphCycle { cycle }) => {
                Some(serde_json::json!({ "cycle": cycle }))
            }
            DocError::Hierarchy(HierarchyError::UnknownSupertype {
                type_name,
                supertype,
            }) => Some(serde_json::json!({ "type": type_name, "supertype": supertype })),
            DocError::Hierarchy(HierarchyError::SignatureConflict {
                type_name,
                signature,
                first,
                second,
            }) => Some(serde_json::json!({
                "type": type_name,
                "signature": signature,
                "returns": [first, second]
            })),
            _ => None,
        };

        ErrorInfo {
            code,
            message,
            details,
        }
    }
}

/// Error response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Status: "error".
    pub status: String,
    /// Schema version for compatibility.
    pub schema_version: String,
    /// Error information.
    pub error: ErrorInfo,
}

impl ErrorResponse {
    /// Create from a DocError.
    pub fn new(err: &DocError) -> Self {
        ErrorResponse {
            status: "error".to_string(),
            schema_version: SCHEMA_VERSION.to_string(),
            error: ErrorInfo::from_error(err),
        }
    }
}

// ============================================================================
// Emit Helpers
// ============================================================================

/// Serialize a response as pretty-printed JSON followed by a newline.
pub fn emit_response<T: Serialize>(response: &T, writer: &mut impl Write) -> io::Result<()> {
    let json = serde_json::to_string_pretty(response)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    writeln!(writer, "{}", json)
}

/// Serialize a response as single-line JSON followed by a newline.
pub fn emit_response_compact<T: Serialize>(
    response: &T,
    writer: &mut impl Write,
) -> io::Result<()> {
    let json = serde_json::to_string(response)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    writeln!(writer, "{}", json)
}

// ============================================================================
// Tests
// ============================================================================
