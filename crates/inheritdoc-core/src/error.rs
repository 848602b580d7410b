//! Error types and error code constants for inheritdoc.
//!
//! Two layers:
//! - [`HierarchyError`]: structural errors raised by the engine while building
//!   the type graph or answering a query. All of them are deterministic; none
//!   is transient.
//! - [`DocError`]: the unified error for the front door. It bridges
//!   `HierarchyError`, I/O and JSON failures into a form suitable for JSON
//!   output, with a stable [`OutputErrorCode`].
//!
//! ## Error Code Mapping
//!
//! - `2`: Invalid arguments (bad flags from caller)
//! - `3`: Resolution errors (unknown type, inheritance cycle, no linearization)
//! - `4`: Invalid input (malformed declarations, dangling supertype, conflicts)
//! - `10`: Internal errors (bugs, unexpected I/O failures)

use std::fmt;
use std::io;
use std::path::Path;

use thiserror::Error;

// ============================================================================
// Structural Errors
// ============================================================================

/// Errors raised while building or querying the type graph.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HierarchyError {
    /// A declared direct supertype has no registered type.
    #[error("type '{type_name}' extends unknown supertype '{supertype}'")]
    UnknownSupertype { type_name: String, supertype: String },

    /// A traversal revisited a node on its own current path.
    ///
    /// `cycle` starts and ends with the same type name.
    #[error("inheritance cycle detected: {}", .cycle.join(" -> "))]
    GraphCycle { cycle: Vec<String> },

    /// One type declares the same signature with two different return types.
    #[error(
        "type '{type_name}' declares '{signature}' with conflicting return types '{first}' and '{second}'"
    )]
    SignatureConflict {
        type_name: String,
        signature: String,
        first: String,
        second: String,
    },

    /// A type name was registered twice.
    #[error("type '{type_name}' is declared more than once")]
    DuplicateType { type_name: String },

    /// A query named a type that is not in the graph.
    #[error("unknown type '{type_name}'")]
    UnknownType { type_name: String },

    /// No C3 linearization exists for the type.
    #[error("inconsistent hierarchy for type '{type_name}': cannot linearize")]
    InconsistentHierarchy { type_name: String },
}

/// Result type for graph construction and queries.
pub type HierarchyResult<T> = Result<T, HierarchyError>;

impl HierarchyError {
    /// Whether this error is raised by graph construction (as opposed to a query).
    pub fn is_construction_error(&self) -> bool {
        matches!(
            self,
            HierarchyError::UnknownSupertype { .. }
                | HierarchyError::SignatureConflict { .. }
                | HierarchyError::DuplicateType { .. }
        )
    }
}

// ============================================================================
// Output Error Codes
// ============================================================================

/// Error codes for JSON output and CLI exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum OutputErrorCode {
    /// Invalid arguments from caller (bad flag values).
    InvalidArguments = 2,
    /// Resolution errors (unknown type, cycle, inconsistent hierarchy).
    ResolutionError = 3,
    /// Declarations could not be turned into a graph.
    InvalidInput = 4,
    /// Internal errors (bugs, unexpected state).
    InternalError = 10,
}

impl OutputErrorCode {
    /// Get the numeric code value.
    pub fn code(&self) -> u8 {
        *self as u8
    }
}

impl fmt::Display for OutputErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

// ============================================================================
// Unified Error Type
// ============================================================================

/// Unified error type for CLI output.
#[derive(Debug, Error)]
pub enum DocError {
    /// Invalid arguments from caller.
    #[error("invalid arguments: {message}")]
    InvalidArguments {
        message: String,
        details: Option<serde_json::Value>,
    },

    /// Declarations file not found.
    #[error("file not found: {path}")]
    FileNotFound { path: String },

    /// Declarations file could not be parsed.
    #[error("invalid declarations: {message}")]
    InvalidInput { message: String },

    /// Structural error from the engine.
    #[error(transparent)]
    Hierarchy(#[from] HierarchyError),

    /// Internal error (bug or unexpected state).
    #[error("internal error: {message}")]
    InternalError { message: String },
}

impl From<&DocError> for OutputErrorCode {
    fn from(err: &DocError) -> Self {
        match err {
            DocError::InvalidArguments { .. } => OutputErrorCode::InvalidArguments,
            DocError::FileNotFound { .. } => OutputErrorCode::InvalidInput,
            DocError::InvalidInput { .. } => OutputErrorCode::InvalidInput,
            DocError::Hierarchy(inner) if inner.is_construction_error() => {
                OutputErrorCode::InvalidInput
            }
            DocError::Hierarchy(_) => OutputErrorCode::ResolutionError,
            DocError::InternalError { .. } => OutputErrorCode::InternalError,
        }
    }
}

impl From<DocError> for OutputErrorCode {
    fn from(err: DocError) -> Self {
        OutputErrorCode::from(&err)
    }
}

// ============================================================================
// Bridge: serde_json::Error -> DocError
// ============================================================================

impl From<serde_json::Error> for DocError {
    fn from(err: serde_json::Error) -> Self {
        DocError::InvalidInput {
            message: err.to_string(),
        }
    }
}

// ============================================================================
// Convenience Constructors
// ============================================================================

impl DocError {
    /// Create an invalid arguments error.
    pub fn invalid_args(message: impl Into<String>) -> Self {
        DocError::InvalidArguments {
            message: message.into(),
            details: None,
        }
    }

    /// Create an invalid arguments error with JSON details.
    pub fn invalid_args_with_details(
        message: impl Into<String>,
        details: serde_json::Value,
    ) -> Self {
        DocError::InvalidArguments {
            message: message.into(),
            details: Some(details),
        }
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        DocError::InternalError {
            message: message.into(),
        }
    }

    /// Map an I/O error on `path`, treating a missing file specially.
    pub fn io(path: &Path, err: io::Error) -> Self {
        if err.kind() == io::ErrorKind::NotFound {
            DocError::FileNotFound {
                path: path.display().to_string(),
            }
        } else {
            DocError::InternalError {
                message: format!("IO error on {}: {}", path.display(), err),
            }
        }
    }

    /// Get the error code for this error.
    pub fn error_code(&self) -> OutputErrorCode {
        OutputErrorCode::from(self)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    mod error_code_mapping {
        use super::*;

        #[test]
        fn cycle_maps_to_resolution_error() {
            let err = DocError::from(HierarchyError::GraphCycle {
                cycle: vec!["A".into(), "B".into(), "A".into()],
            });
            assert_eq!(err.error_code(), OutputErrorCode::ResolutionError);
            assert_eq!(err.error_code().code(), 3);
        }

        #[test]
        fn unknown_type_maps_to_resolution_error() {
            let err = DocError::from(HierarchyError::UnknownType {
                type_name: "pkg.Missing".into(),
            });
            assert_eq!(err.error_code(), OutputErrorCode::ResolutionError);
        }

        #[test]
        fn construction_errors_map_to_invalid_input() {
            let err = DocError::from(HierarchyError::UnknownSupertype {
                type_name: "A".into(),
                supertype: "B".into(),
            });
            assert_eq!(err.error_code(), OutputErrorCode::InvalidInput);

            let err = DocError::from(HierarchyError::SignatureConflict {
                type_name: "A".into(),
                signature: "foo()".into(),
                first: "int".into(),
                second: "long".into(),
            });
            assert_eq!(err.error_code().code(), 4);
        }

        #[test]
        fn invalid_arguments_maps_to_invalid_arguments() {
            let err = DocError::invalid_args("unknown order 'sideways'");
            assert_eq!(err.error_code(), OutputErrorCode::InvalidArguments);
            assert_eq!(err.error_code().code(), 2);
        }

        #[test]
        fn missing_file_maps_to_file_not_found() {
            let err = DocError::io(
                Path::new("decls.json"),
                io::Error::new(io::ErrorKind::NotFound, "gone"),
            );
            assert!(matches!(err, DocError::FileNotFound { .. }));
            assert_eq!(err.error_code(), OutputErrorCode::InvalidInput);
        }

        #[test]
        fn other_io_errors_are_internal() {
            let err = DocError::io(
                Path::new("decls.json"),
                io::Error::new(io::ErrorKind::PermissionDenied, "nope"),
            );
            assert_eq!(err.error_code(), OutputErrorCode::InternalError);
        }
    }

    mod error_display {
        use super::*;

        #[test]
        fn cycle_display_joins_path() {
            let err = HierarchyError::GraphCycle {
                cycle: vec!["A".into(), "B".into(), "C".into(), "A".into()],
            };
            assert_eq!(err.to_string(), "inheritance cycle detected: A -> B -> C -> A");
        }

        #[test]
        fn unknown_supertype_display() {
            let err = HierarchyError::UnknownSupertype {
                type_name: "pkg3.I1".into(),
                supertype: "pkg3.Nope".into(),
            };
            assert_eq!(
                err.to_string(),
                "type 'pkg3.I1' extends unknown supertype 'pkg3.Nope'"
            );
        }

        #[test]
        fn hierarchy_error_is_transparent_in_doc_error() {
            let err = DocError::from(HierarchyError::UnknownType {
                type_name: "X".into(),
            });
            assert_eq!(err.to_string(), "unknown type 'X'");
        }
    }
}
