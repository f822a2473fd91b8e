//! `targetgraph resolve` command

use anyhow::Result;

use crate::cli::ResolveArgs;
use targetgraph::ops::resolve_path;
use targetgraph::util::GlobalContext;

pub fn execute(ctx: &GlobalContext, args: ResolveArgs) -> Result<()> {
    let graph = resolve_path(ctx, &args.snapshot)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(graph.source_sets())?);
        return Ok(());
    }

    for source_set in graph.iter() {
        let tags = source_set.tags();
        if tags.is_empty() {
            println!("{}", source_set.display_name());
        } else {
            println!("{} ({})", source_set.display_name(), tags.join(", "));
        }
        println!("    id: {}", source_set.target_id());

        if ctx.is_verbose() {
            let languages: Vec<&str> = source_set.languages().map(|l| l.as_str()).collect();
            if !languages.is_empty() {
                println!("    languages: {}", languages.join(", "));
            }
        }

        for dep in graph.deps(&source_set.id()) {
            println!("    -> {}", dep.display_name());
        }
    }

    Ok(())
}
