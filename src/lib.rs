//! inheritdoc: inherited-member resolution for API documentation pages.
//!
//! Given a graph of classes and interfaces, works out under which ancestor a
//! type's page lists each inherited method, including diamond-shaped
//! multiple inheritance where sibling supertypes declare the same method.

// Engine - re-exported from inheritdoc-core
pub use inheritdoc_core::ancestors;
pub use inheritdoc_core::config;
pub use inheritdoc_core::declarations;
pub use inheritdoc_core::error;
pub use inheritdoc_core::graph;
pub use inheritdoc_core::linearize;
pub use inheritdoc_core::output;
pub use inheritdoc_core::resolve;
pub use inheritdoc_core::signatures;
pub use inheritdoc_core::types;

// Front door
pub mod cli;
