//! targetgraph CLI - build target synthesis for composite JVM builds

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use targetgraph::resolver::ResolveError;
use targetgraph::util::diagnostic;

mod cli;
mod commands;

use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();
    let color = !cli.no_color;

    if let Err(e) = run(cli) {
        match e.downcast_ref::<ResolveError>() {
            Some(err) => diagnostic::emit(&err.to_diagnostic(), color),
            None => eprintln!("error: {:#}", e),
        }
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("targetgraph=debug")
    } else {
        EnvFilter::new("targetgraph=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(!cli.no_color)
        .with_target(false)
        .without_time()
        .init();

    let mut ctx = targetgraph::GlobalContext::new()?;
    ctx.set_verbose(cli.verbose);
    ctx.set_color(!cli.no_color);

    // Execute command
    match cli.command {
        Commands::Resolve(args) => commands::resolve::execute(&ctx, args),
        Commands::Diff(args) => commands::diff::execute(&ctx, args),
        Commands::Tree(args) => commands::tree::execute(&ctx, args),
        Commands::Completions(args) => commands::completions::execute(args),
    }
}
