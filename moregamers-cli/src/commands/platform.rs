//! `moregamers platform`: show the store tag sent to the ad server.

use std::path::PathBuf;

use clap::Args;
use moregamers::store::DeviceSignals;
use moregamers::Platform;

use super::common::load_config;
use crate::error::CliError;

/// Arguments for the platform command.
#[derive(Debug, Args)]
pub struct PlatformArgs {
    /// Resolve for this device model instead of the host (e.g. "Amazon KFTT")
    #[arg(long)]
    pub model: Option<String>,

    /// List every known tag
    #[arg(long)]
    pub all: bool,

    /// Config file (default: ~/.moregamers/config.ini)
    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// Run the platform command.
pub fn run(args: PlatformArgs) -> Result<(), CliError> {
    if args.all {
        for platform in Platform::ALL {
            println!("{:<12} {:?}", platform.as_str(), platform);
        }
        return Ok(());
    }

    let config = load_config(args.config.as_deref())?;
    let (platform, source) = resolve(args.model.as_deref(), config.platform);
    println!("{} ({})", platform, source);
    Ok(())
}

/// The platform and where it came from.
fn resolve(model: Option<&str>, configured: Option<Platform>) -> (Platform, &'static str) {
    match (model, configured) {
        (Some(model), _) => {
            let signals = DeviceSignals::new(model, DeviceSignals::detect().os);
            (Platform::resolve(&signals), "device model")
        }
        (None, Some(platform)) => (platform, "config file"),
        (None, None) => (Platform::resolve(&DeviceSignals::detect()), "host"),
    }
}
