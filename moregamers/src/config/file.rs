//! Configuration file handling for ~/.moregamers/config.ini.
//!
//! ```ini
//! [banner]
//! placement_id = my-game
//! base_url = https://app.moregamers.com/
//! refresh_window = 20
//!
//! [network]
//! timeout = 30
//!
//! [store]
//! platform = android
//! ```
//!
//! Every key is optional; anything absent keeps its default.

use std::path::{Path, PathBuf};
use std::time::Duration;

use ini::Ini;
use thiserror::Error;

use super::banner::BannerConfig;
use crate::store::Platform;

/// Configuration file errors.
#[derive(Debug, Error)]
pub enum ConfigFileError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] ini::Error),

    /// Invalid configuration value
    #[error("Invalid configuration: {section}.{key} = '{value}' - {reason}")]
    InvalidValue {
        section: String,
        key: String,
        value: String,
        reason: String,
    },
}

/// Settings loaded from the INI file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigFile {
    pub banner: BannerConfig,
    /// Store override; `None` means resolve from the device.
    pub platform: Option<Platform>,
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            banner: BannerConfig::new(""),
            platform: None,
        }
    }
}

/// Default config file location (`~/.moregamers/config.ini`).
pub fn config_file_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".moregamers")
        .join("config.ini")
}

impl ConfigFile {
    /// Load configuration from the default path.
    pub fn load() -> Result<Self, ConfigFileError> {
        Self::load_from(&config_file_path())
    }

    /// Load configuration from a specific path.
    ///
    /// If the file doesn't exist, returns defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigFileError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let ini = Ini::load_from_file(path)?;
        parse_ini(&ini)
    }

    /// Parse configuration from INI text.
    pub fn from_ini_str(text: &str) -> Result<Self, ConfigFileError> {
        let ini = Ini::load_from_str(text).map_err(ini::Error::Parse)?;
        parse_ini(&ini)
    }
}

fn invalid(section: &str, key: &str, value: &str, reason: &str) -> ConfigFileError {
    ConfigFileError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();

    // [banner] section
    if let Some(section) = ini.section(Some("banner")) {
        if let Some(v) = section.get("placement_id") {
            config.banner.placement_id = v.trim().to_string();
        }
        if let Some(v) = section.get("base_url") {
            let v = v.trim();
            if !v.starts_with("http://") && !v.starts_with("https://") {
                return Err(invalid(
                    "banner",
                    "base_url",
                    v,
                    "must be an http:// or https:// URL",
                ));
            }
            config.banner = config.banner.with_base_url(v);
        }
        if let Some(v) = section.get("sdk_version") {
            let v = v.trim();
            if !v.is_empty() {
                config.banner.sdk_version = v.to_string();
            }
        }
        if let Some(v) = section.get("refresh_window") {
            let secs: u64 = v.trim().parse().map_err(|_| {
                invalid(
                    "banner",
                    "refresh_window",
                    v,
                    "must be a non-negative integer (seconds)",
                )
            })?;
            config.banner.refresh_window = Duration::from_secs(secs);
        }
    }

    // [network] section
    if let Some(section) = ini.section(Some("network")) {
        if let Some(v) = section.get("timeout") {
            let secs: u64 = v
                .trim()
                .parse()
                .ok()
                .filter(|s| *s > 0)
                .ok_or_else(|| {
                    invalid("network", "timeout", v, "must be a positive integer (seconds)")
                })?;
            config.banner.request_timeout_secs = secs;
        }
    }

    // [store] section
    if let Some(section) = ini.section(Some("store")) {
        if let Some(v) = section.get("platform") {
            let v = v.trim();
            if !v.is_empty() {
                let platform = v
                    .parse::<Platform>()
                    .map_err(|e| invalid("store", "platform", v, &e.to_string()))?;
                config.platform = Some(platform);
            }
        }
    }

    Ok(config)
}
