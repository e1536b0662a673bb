//! Configuration.
//!
//! [`BannerConfig`] is what the controller consumes. [`ConfigFile`] loads it
//! (plus an optional store override) from `~/.moregamers/config.ini`.

mod banner;
mod file;

pub use banner::{BannerConfig, DEFAULT_REFRESH_WINDOW};
pub use file::{config_file_path, ConfigFile, ConfigFileError};
