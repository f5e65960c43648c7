// ABOUTME: Entry point for the dockhand CLI application.
// ABOUTME: Parses arguments and dispatches to appropriate command handlers.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use dockhand::config::{self, CONFIG_FILENAME, Config};
use dockhand::deploy::DeploymentRequest;
use dockhand::error::{Error, Result};
use dockhand::output::{Output, OutputMode};
use std::env;
use std::path::Path;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // --verbose wins; otherwise RUST_LOG, then a per-command default
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        let fallback = match cli.command {
            Commands::Serve { .. } => "info",
            _ => "warn",
        };
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    let result = run(cli).await;

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Init { domain, force } => {
            let cwd = env::current_dir()?;
            config::init_config(&cwd, domain.as_deref(), force)?;
            println!("Created {}", CONFIG_FILENAME);
            Ok(())
        }
        Commands::Serve { bind } => {
            let config = load_config(cli.config.as_deref())?;
            commands::serve(config, bind).await
        }
        Commands::Deploy {
            owner,
            repo,
            port,
            env,
            json,
            quiet,
        } => {
            let request = DeploymentRequest::parse(&owner, &repo, port, &env)
                .map_err(|e| Error::InvalidRequest(e.to_string()))?;
            let config = load_config(cli.config.as_deref())?;
            let output = Output::new(OutputMode::from_flags(json, quiet));
            commands::deploy(config, request, output).await
        }
        Commands::Check => {
            let config = load_config(cli.config.as_deref())?;
            commands::check(config).await
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load(path),
        None => Config::discover(&env::current_dir()?),
    }
}
