//! CLI error handling with user-friendly messages.

use std::fmt;
use std::process;

use moregamers::config::ConfigFileError;
use moregamers::provider::TransportError;
use moregamers::BannerError;

/// CLI-specific errors.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(std::io::Error),
    /// Configuration error
    Config(String),
    /// Failed to build the HTTP client
    Client(TransportError),
    /// Failed to create the banner controller
    Controller(BannerError),
    /// The ad server did not produce a banner
    Failed,
    /// The request ended without any event
    NoBanner(&'static str),
    /// Failed to write output file
    FileWrite { path: String, error: std::io::Error },
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        match self {
            CliError::Failed => {
                eprintln!();
                eprintln!("Check that:");
                eprintln!("  1. The placement ID is registered with MoreGamers");
                eprintln!("  2. The ad server is reachable (see logs/moregamers.log)");
            }
            CliError::Config(_) => {
                eprintln!();
                eprintln!("Configuration is read from ~/.moregamers/config.ini by default.");
                eprintln!("Run 'moregamers config show' to see the effective settings.");
            }
            _ => {}
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(e) => write!(f, "Failed to initialize logging: {}", e),
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::Client(e) => write!(f, "Failed to create HTTP client: {}", e),
            CliError::Controller(e) => write!(f, "Failed to create banner controller: {}", e),
            CliError::Failed => write!(f, "Banner request failed"),
            CliError::NoBanner(reason) => write!(f, "No banner received: {}", reason),
            CliError::FileWrite { path, error } => {
                write!(f, "Failed to write file '{}': {}", path, error)
            }
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::LoggingInit(e) => Some(e),
            CliError::Client(e) => Some(e),
            CliError::Controller(e) => Some(e),
            CliError::FileWrite { error, .. } => Some(error),
            _ => None,
        }
    }
}

impl From<ConfigFileError> for CliError {
    fn from(e: ConfigFileError) -> Self {
        CliError::Config(e.to_string())
    }
}
