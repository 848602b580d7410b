//! Core engine for inheritdoc.
//!
//! Decides, for a type's reference page, which ancestors are credited with
//! each inherited method when the type inherits through several (possibly
//! diamond-shaped) supertype paths:
//! - Type graph model with interned type ids and direct-supertype edges
//! - Signature index of directly declared methods
//! - Ancestor collection in stable pre-order with cycle detection
//! - Override resolution (maximal declarers per signature) and grouping
//! - C3 linearization as an alternative group order
//! - Declaration input, JSON responses and text rendering
//! - Error types, error codes and layered configuration

pub mod ancestors;
pub mod config;
pub mod declarations;
pub mod error;
pub mod graph;
pub mod linearize;
pub mod output;
pub mod resolve;
pub mod signatures;
pub mod types;
