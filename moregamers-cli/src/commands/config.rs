//! Configuration CLI commands.
//!
//! `config show` prints the effective settings and `config path` the file
//! they are read from.

use std::path::PathBuf;

use clap::Subcommand;
use moregamers::config::config_file_path;

use super::common::load_config;
use crate::error::CliError;

/// Config subcommands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Show the effective configuration
    Show {
        /// Config file (default: ~/.moregamers/config.ini)
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Show the configuration file path
    Path,
}

/// Run a config subcommand.
pub fn run(command: ConfigCommands) -> Result<(), CliError> {
    match command {
        ConfigCommands::Show { config } => run_show(config),
        ConfigCommands::Path => {
            println!("{}", config_file_path().display());
            Ok(())
        }
    }
}

fn run_show(path: Option<PathBuf>) -> Result<(), CliError> {
    let config = load_config(path.as_deref())?;
    let banner = &config.banner;

    println!("[banner]");
    if banner.has_placement() {
        println!("  placement_id   = {}", banner.placement_id);
    } else {
        println!("  placement_id   = (not set)");
    }
    println!("  base_url       = {}", banner.base_url);
    println!("  sdk_version    = {}", banner.sdk_version);
    println!("  refresh_window = {}", banner.refresh_window.as_secs());
    println!();
    println!("[network]");
    println!("  timeout        = {}", banner.request_timeout_secs);
    println!();
    println!("[store]");
    match config.platform {
        Some(platform) => println!("  platform       = {}", platform),
        None => println!("  platform       = (detect)"),
    }

    Ok(())
}
