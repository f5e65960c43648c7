// ABOUTME: Command-line interface definition using clap derive macros.
// ABOUTME: Defines all subcommands and their arguments.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use dockhand::deploy::{DEFAULT_ENV, DEFAULT_PORT};

#[derive(Parser)]
#[command(name = "dockhand")]
#[command(about = "Deploy GitHub repositories as containers behind nginx")]
#[command(version)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file (default: dockhand.yml in the current directory)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new dockhand.yml configuration file
    Init {
        /// Public domain deployments live under
        #[arg(long)]
        domain: Option<String>,

        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Run the HTTP API
    Serve {
        /// Listen address (overrides server.bind)
        #[arg(short, long)]
        bind: Option<SocketAddr>,
    },

    /// Deploy one repository without the HTTP API
    Deploy {
        /// Repository owner
        owner: String,

        /// Repository name
        repo: String,

        /// Port the application listens on inside the container
        #[arg(short, long, default_value_t = DEFAULT_PORT)]
        port: u16,

        /// Comma-separated KEY=VALUE environment
        #[arg(short, long, default_value = DEFAULT_ENV)]
        env: String,

        /// Emit JSON lines
        #[arg(long)]
        json: bool,

        /// Print only the result
        #[arg(short, long)]
        quiet: bool,
    },

    /// Validate the configuration and reach the container engine
    Check,
}
