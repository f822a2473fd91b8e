//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

/// targetgraph - build target synthesis for composite JVM builds
#[derive(Parser)]
#[command(name = "targetgraph")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve the build targets described by a snapshot
    Resolve(ResolveArgs),

    /// Show the targets that changed between two snapshots
    Diff(DiffArgs),

    /// Display the target dependency tree
    Tree(TreeArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args)]
pub struct ResolveArgs {
    /// Path to the build snapshot (JSON)
    pub snapshot: PathBuf,

    /// Print the resolved source sets as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct DiffArgs {
    /// Snapshot before the change
    pub old: PathBuf,

    /// Snapshot after the change
    pub new: PathBuf,

    /// Print the changes as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct TreeArgs {
    /// Path to the build snapshot (JSON)
    pub snapshot: PathBuf,

    /// Only show the tree of this target (build target id or display name)
    #[arg(long)]
    pub target: Option<String>,

    /// Maximum depth to display
    #[arg(long)]
    pub depth: Option<usize>,
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}
