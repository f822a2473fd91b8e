//! `targetgraph tree` command

use std::collections::HashSet;

use anyhow::{anyhow, Result};

use crate::cli::TreeArgs;
use targetgraph::core::SourceSetId;
use targetgraph::ops::{find_target, resolve_path};
use targetgraph::resolver::TargetGraph;
use targetgraph::util::diagnostic::suggestions;
use targetgraph::util::GlobalContext;

pub fn execute(ctx: &GlobalContext, args: TreeArgs) -> Result<()> {
    let graph = resolve_path(ctx, &args.snapshot)?;
    let max_depth = args.depth.unwrap_or(usize::MAX);

    let roots: Vec<SourceSetId> = match &args.target {
        Some(query) => {
            let target = find_target(&graph, query).ok_or_else(|| {
                anyhow!(
                    "target `{}` not found in {}\n{}",
                    query,
                    args.snapshot.display(),
                    suggestions::TARGET_NOT_FOUND
                )
            })?;
            vec![target.id()]
        }
        // Targets nothing depends on
        None => graph
            .iter()
            .filter(|s| graph.dependents(&s.id()).is_empty())
            .map(|s| s.id())
            .collect(),
    };

    let mut seen = HashSet::new();
    for root in &roots {
        print_tree(&graph, root, 0, max_depth, &mut seen);
    }

    // Cycle members all have dependents; start from the first unprinted one
    if args.target.is_none() {
        for source_set in graph.topological_order() {
            let id = source_set.id();
            if !seen.contains(&id) {
                print_tree(&graph, &id, 0, max_depth, &mut seen);
            }
        }
    }

    Ok(())
}

fn print_tree(
    graph: &TargetGraph,
    id: &SourceSetId,
    depth: usize,
    max_depth: usize,
    seen: &mut HashSet<SourceSetId>,
) {
    if depth > max_depth {
        return;
    }
    let Some(source_set) = graph.get(id) else {
        return;
    };

    let is_duplicate = !seen.insert(id.clone());

    let prefix = if depth == 0 {
        String::new()
    } else {
        format!("{}├── ", "│   ".repeat(depth - 1))
    };
    let dup_marker = if is_duplicate { " (*)" } else { "" };

    println!("{}{}{}", prefix, source_set.display_name(), dup_marker);

    // Don't recurse into duplicates; this also stops at cycles
    if is_duplicate {
        return;
    }

    for dep in graph.deps(id) {
        print_tree(graph, &dep.id(), depth + 1, max_depth, seen);
    }
}
