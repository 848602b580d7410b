//! Command implementations shared by the binary and the integration tests.
//!
//! Each `run_*` function loads a declaration file, builds the graph, runs one
//! query and returns the rendered output. Errors are returned, never printed;
//! the caller turns them into an error response and an exit code.

use std::path::Path;

use serde::Serialize;

use inheritdoc_core::ancestors::ancestors_of;
use inheritdoc_core::config::{OutputFormat, ResolvedConfig};
use inheritdoc_core::declarations::Declarations;
use inheritdoc_core::error::DocError;
use inheritdoc_core::graph::TypeGraph;
use inheritdoc_core::output::{
    emit_response, render_text, AncestorsResponse, CheckResponse, ResolveResponse,
};
use inheritdoc_core::resolve::Resolver;

/// Load declarations from `input` and build the type graph.
pub fn load_graph(input: &Path) -> Result<TypeGraph, DocError> {
    let graph = Declarations::from_path(input)?.build_graph()?;
    tracing::debug!("Built graph with {} types from {}", graph.len(), input.display());
    Ok(graph)
}

/// Inherited-method groups for `type_name`.
pub fn run_resolve(
    input: &Path,
    type_name: &str,
    config: &ResolvedConfig,
) -> Result<String, DocError> {
    let graph = load_graph(input)?;
    let target = graph.require(type_name)?;
    let resolution = Resolver::new(&graph)
        .with_order(config.order.value)
        .resolve(target)?;

    match config.format.value {
        OutputFormat::Json => to_json(&ResolveResponse::new(&graph, &resolution)),
        OutputFormat::Text => Ok(render_text(&graph, &resolution)),
    }
}

/// Ancestors of `type_name` in pre-order, with minimal depths.
pub fn run_ancestors(
    input: &Path,
    type_name: &str,
    config: &ResolvedConfig,
) -> Result<String, DocError> {
    let graph = load_graph(input)?;
    let target = graph.require(type_name)?;
    let ancestors = ancestors_of(&graph, target)?;

    match config.format.value {
        OutputFormat::Json => to_json(&AncestorsResponse::new(&graph, &ancestors)),
        OutputFormat::Text => {
            let mut out = String::new();
            for entry in ancestors.iter() {
                out.push_str(&format!(
                    "{} {} (depth {})\n",
                    graph.kind(entry.id),
                    graph.name(entry.id),
                    entry.depth
                ));
            }
            Ok(out)
        }
    }
}

/// Validate a declaration file, including whole-graph cycle detection.
pub fn run_check(input: &Path, config: &ResolvedConfig) -> Result<String, DocError> {
    let graph = load_graph(input)?;
    graph.check_acyclic()?;
    let response = CheckResponse::new(&graph);

    match config.format.value {
        OutputFormat::Json => to_json(&response),
        OutputFormat::Text => Ok(format!(
            "ok: {} types, {} signatures\n",
            response.types, response.signatures
        )),
    }
}

fn to_json<T: Serialize>(response: &T) -> Result<String, DocError> {
    let mut buf = Vec::new();
    emit_response(response, &mut buf)
        .map_err(|e| DocError::internal(format!("failed to serialize response: {}", e)))?;
    String::from_utf8(buf).map_err(|e| DocError::internal(format!("response is not UTF-8: {}", e)))
}
