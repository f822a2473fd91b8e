//! Snapshot resolution operations.

use std::path::Path;

use anyhow::{Context, Result};

use crate::core::SourceSet;
use crate::host::SnapshotHost;
use crate::resolver::{self, TargetGraph};
use crate::util::diagnostic::suggestions;
use crate::util::GlobalContext;

/// Load a snapshot file as a build host, honoring the configured job count.
pub fn load_host(ctx: &GlobalContext, snapshot: &Path) -> Result<SnapshotHost> {
    let path = ctx.resolve_path(snapshot);
    let config = ctx.config();

    let host = SnapshotHost::load(&path)
        .with_context(|| {
            format!(
                "failed to load build snapshot {}\n{}",
                path.display(),
                suggestions::BAD_SNAPSHOT
            )
        })?;
    Ok(host.with_jobs(config.resolve.jobs))
}

/// Resolve the target graph described by a snapshot file.
pub fn resolve_path(ctx: &GlobalContext, snapshot: &Path) -> Result<TargetGraph> {
    let options = ctx.config().resolve_options()?;
    let host = load_host(ctx, snapshot)?;

    tracing::debug!("Resolving {}", snapshot.display());
    let graph = resolver::resolve(&host, &options)?;

    for cycle in graph.cycles() {
        let members: Vec<String> = cycle.iter().map(|id| id.to_string()).collect();
        tracing::warn!("Dependency cycle: {}", members.join(" -> "));
    }

    Ok(graph)
}

/// Find a target by build target id, display name, or `<dir> [<name>]`.
pub fn find_target<'g>(graph: &'g TargetGraph, query: &str) -> Option<&'g SourceSet> {
    graph.iter().find(|source_set| {
        source_set.target_id().as_str() == query
            || source_set.display_name() == query
            || source_set.id().to_string() == query
    })
}
