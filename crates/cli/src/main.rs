#![cfg_attr(
    not(test),
    deny(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic,
        clippy::unimplemented,
        clippy::todo,
        clippy::indexing_slicing
    )
)]

//! # sortlab
//!
//! The command-line entry point for the sortlab exercise service: runs the
//! HTTP gateway over the persistent store, and manages configuration files.

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;

use commands::*;

#[derive(Parser, Debug)]
#[clap(
    name = "sortlab",
    version,
    about = "The sortlab exercise service.",
    long_about = "Serves the exercise persistence API used by the AR sorting lab, and manages its configuration."
)]
struct Cli {
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the exercise API server.
    Serve(serve::ServeArgs),

    /// Generate and validate service configurations.
    Config(config::ConfigCmdArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Serve(args) => serve::run(args).await,
        Commands::Config(args) => config::run(args),
    }
}
