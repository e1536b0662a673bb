//! Common types and utilities shared across CLI commands.

use std::path::Path;

use clap::ValueEnum;
use moregamers::config::ConfigFile;
use moregamers::store::DeviceSignals;
use moregamers::{BannerShape, Platform};

use crate::error::CliError;

/// Banner shape selection for CLI arguments.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq)]
pub enum ShapeArg {
    /// Square slot, served with the landscape image
    Square,
    /// Rectangle slot, served with the portrait image
    Rectangle,
}

impl From<ShapeArg> for BannerShape {
    fn from(shape: ShapeArg) -> Self {
        match shape {
            ShapeArg::Square => BannerShape::Square,
            ShapeArg::Rectangle => BannerShape::Rectangle,
        }
    }
}

/// Load the config file from `path`, or from the default location.
pub fn load_config(path: Option<&Path>) -> Result<ConfigFile, CliError> {
    let config = match path {
        Some(path) => {
            if !path.exists() {
                return Err(CliError::Config(format!(
                    "Config file '{}' does not exist",
                    path.display()
                )));
            }
            ConfigFile::load_from(path)?
        }
        None => ConfigFile::load()?,
    };
    Ok(config)
}

/// Resolve the store tag: CLI flag, then config file, then the host device.
pub fn resolve_platform(cli: Option<Platform>, config: &ConfigFile) -> Platform {
    cli.or(config.platform)
        .unwrap_or_else(|| Platform::resolve(&DeviceSignals::detect()))
}
