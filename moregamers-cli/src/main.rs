//! MoreGamers CLI - Command-line interface
//!
//! Fetches a banner the way a game would and inspects the configuration
//! the SDK runs with.

mod commands;
mod error;

use clap::{Parser, Subcommand};
use moregamers::logging::{default_log_dir, default_log_file, init_logging};

use commands::config::ConfigCommands;
use commands::fetch::FetchArgs;
use commands::platform::PlatformArgs;
use error::CliError;

#[derive(Parser)]
#[command(name = "moregamers")]
#[command(version, about = "Fetch MoreGamers cross-promotion banners", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Request one banner and save its image
    Fetch(FetchArgs),

    /// Show the store tag reported to the ad server
    Platform(PlatformArgs),

    /// Inspect configuration
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        e.exit();
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Commands::Fetch(args) => {
            let _logging = init_logging(default_log_dir(), default_log_file())
                .map_err(CliError::LoggingInit)?;
            commands::fetch::run(args).await
        }
        Commands::Platform(args) => commands::platform::run(args),
        Commands::Config(command) => commands::config::run(command),
    }
}
