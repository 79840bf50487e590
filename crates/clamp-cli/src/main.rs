//! clamp: bounded web-API tools for LLM agents.
//!
//! Lists the configured tools, calls them, and runs the output bounding
//! engine over local payloads.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use clamp_core::ConfigStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter("clamp=debug")
            .with_writer(std::io::stderr)
            .init();
    }

    let store = match cli.config {
        Some(ref path) => ConfigStore::with_path(path),
        None => ConfigStore::new(),
    };

    match cli.command {
        Commands::Tools { ref name } => {
            let tools = commands::load_tool_registry(&store)?;
            commands::tools::run(&tools, name.as_deref())?;
        }
        Commands::Invoke {
            ref name,
            ref args,
            ref limit,
            ref regexp,
            metadata,
        } => {
            let tools = commands::load_tool_registry(&store)?;
            let options = commands::invoke::InvokeOptions {
                args: args.clone(),
                limit: limit.clone(),
                regexp: regexp.clone(),
                metadata,
            };
            commands::invoke::run(&tools, name, options).await?;
        }
        Commands::Bound {
            ref file,
            ref limit,
            ref regexp,
            json,
        } => {
            commands::bound::run(file.as_deref(), limit.as_deref(), regexp.as_deref(), json)?;
        }
    }

    Ok(())
}
