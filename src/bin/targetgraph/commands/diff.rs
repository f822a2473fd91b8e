//! `targetgraph diff` command

use anyhow::Result;

use crate::cli::DiffArgs;
use targetgraph::ops::diff_paths;
use targetgraph::util::GlobalContext;

pub fn execute(ctx: &GlobalContext, args: DiffArgs) -> Result<()> {
    let changes = diff_paths(ctx, &args.old, &args.new)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&changes)?);
        return Ok(());
    }

    if changes.is_empty() {
        println!("No changes");
        return Ok(());
    }

    for change in &changes {
        println!("{}", change);
    }

    Ok(())
}
