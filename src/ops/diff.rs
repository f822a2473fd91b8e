//! Snapshot comparison.

use std::path::Path;

use anyhow::{Context, Result};

use crate::diff::{changes_between, TargetChange};
use crate::ops::resolve::resolve_path;
use crate::util::GlobalContext;

/// Resolve two snapshots and report every target that differs between them.
pub fn diff_paths(ctx: &GlobalContext, old: &Path, new: &Path) -> Result<Vec<TargetChange>> {
    let old_graph = resolve_path(ctx, old)
        .with_context(|| format!("failed to resolve {}", old.display()))?;
    let new_graph = resolve_path(ctx, new)
        .with_context(|| format!("failed to resolve {}", new.display()))?;

    if old_graph.fingerprint()? == new_graph.fingerprint()? {
        tracing::debug!("Snapshots resolve to identical graphs");
        return Ok(Vec::new());
    }

    Ok(changes_between(&old_graph, &new_graph))
}
