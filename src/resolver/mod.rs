//! Target graph resolution.
//!
//! Collects every linked build, fetches all project models in one batch,
//! then runs the synthesis pass (merge, link, sanitize) over the complete
//! set. The synthesis is pure and deterministic: all host I/O happens
//! before it, and every resolve rebuilds the graph from scratch.

pub mod collect;
pub mod errors;
pub mod fetch;
pub mod graph;
pub mod link;
pub mod merge;
pub mod sanitize;

pub use collect::collect_build_roots;
pub use errors::ResolveError;
pub use fetch::fetch_project_models;
pub use graph::TargetGraph;
pub use link::{link, LinkStats, OutputIndex};
pub use merge::{merge_source_sets, DuplicatePolicy};
pub use sanitize::sanitize;

use crate::core::LanguageFilter;
use crate::host::{BuildHost, ProjectModels};

/// Knobs for one resolve.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolveOptions {
    pub on_duplicate: DuplicatePolicy,
    pub languages: LanguageFilter,
}

/// Resolve the full target graph reachable from the host's root build.
///
/// Fails atomically: any fetch failure or identity collision yields no
/// graph at all.
pub fn resolve(host: &dyn BuildHost, options: &ResolveOptions) -> Result<TargetGraph, ResolveError> {
    let roots = collect_build_roots(host);
    let models = fetch_project_models(host, &roots)?;
    let graph = synthesize(&models, options)?;

    tracing::info!(
        "Resolved {} target(s) across {} build(s)",
        graph.len(),
        roots.len()
    );
    Ok(graph)
}

/// Turn fetched fragments into a frozen graph.
pub fn synthesize(
    models: &[ProjectModels<'_>],
    options: &ResolveOptions,
) -> Result<TargetGraph, ResolveError> {
    let mut source_sets = merge_source_sets(models, options.on_duplicate, &options.languages)?;
    link(&mut source_sets);
    sanitize(&mut source_sets);
    Ok(TargetGraph::new(source_sets))
}
