//! The `config` command: generate and validate service configurations.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use sortlab_types::ServiceConfig;
use std::path::{Path, PathBuf};

#[derive(Args, Debug)]
pub struct ConfigCmdArgs {
    #[clap(subcommand)]
    command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Write a default configuration file.
    Init {
        #[clap(long, default_value = "sortlab.toml")]
        path: PathBuf,
        /// Overwrite an existing file.
        #[clap(long)]
        force: bool,
    },
    /// Check that a configuration file parses.
    Validate {
        #[clap(long, default_value = "sortlab.toml")]
        path: PathBuf,
    },
}

pub fn run(args: ConfigCmdArgs) -> Result<()> {
    match args.command {
        ConfigCommands::Init { path, force } => init(&path, force),
        ConfigCommands::Validate { path } => validate(&path),
    }
}

fn init(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        anyhow::bail!("{} already exists (use --force to overwrite)", path.display());
    }
    let rendered = toml::to_string_pretty(&ServiceConfig::default())?;
    std::fs::write(path, rendered).with_context(|| format!("writing {}", path.display()))?;
    println!("wrote {}", path.display());
    Ok(())
}

fn validate(path: &Path) -> Result<()> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let config: ServiceConfig =
        toml::from_str(&raw).with_context(|| format!("parsing {}", path.display()))?;
    println!(
        "{} is valid (listen_addr = {}, db_path = {})",
        path.display(),
        config.listen_addr,
        config.db_path.display()
    );
    Ok(())
}
