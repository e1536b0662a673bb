//! Store (distribution channel) identification.
//!
//! The metadata endpoint wants to know which store the host application was
//! installed from. The tag is resolved once at startup from a handful of
//! device signals and never changes afterwards.

use std::fmt;
use std::str::FromStr;

/// Device model substring that identifies Amazon hardware (Kindle Fire etc.).
const AMAZON_MODEL_IDENTIFIER: &str = "Amazon";

/// Distribution channel reported to the ad server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Platform {
    /// Unknown or desktop build.
    #[default]
    None,
    Itunes,
    Amazon,
    GooglePlay,
    Windows,
    Blackberry,
}

impl Platform {
    /// Every platform, in wire-tag order.
    pub const ALL: [Platform; 6] = [
        Platform::None,
        Platform::Itunes,
        Platform::Amazon,
        Platform::GooglePlay,
        Platform::Windows,
        Platform::Blackberry,
    ];

    /// The tag sent as the `platform` query parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::None => "development",
            Platform::Itunes => "ios",
            Platform::Amazon => "amazon",
            Platform::GooglePlay => "android",
            Platform::Windows => "windows",
            Platform::Blackberry => "blackberry",
        }
    }

    /// Resolve the platform from device signals.
    ///
    /// Amazon devices run Android, so the model check has to win over the
    /// operating system check.
    pub fn resolve(signals: &DeviceSignals) -> Self {
        if signals.device_model.contains(AMAZON_MODEL_IDENTIFIER) {
            return Platform::Amazon;
        }

        match signals.os {
            HostOs::Android => Platform::GooglePlay,
            HostOs::Ios => Platform::Itunes,
            HostOs::WindowsPhone => Platform::Windows,
            HostOs::Other => Platform::None,
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string is not a known platform tag.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown platform '{0}' (expected one of: development, ios, amazon, android, windows, blackberry)")]
pub struct UnknownPlatform(pub String);

impl FromStr for Platform {
    type Err = UnknownPlatform;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim().to_lowercase();
        Platform::ALL
            .into_iter()
            .find(|p| p.as_str() == tag)
            .ok_or(UnknownPlatform(s.to_string()))
    }
}

/// Operating system family of the host device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostOs {
    Android,
    Ios,
    WindowsPhone,
    Other,
}

/// Signals used to pick a [`Platform`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceSignals {
    /// Hardware model string as reported by the device.
    pub device_model: String,
    pub os: HostOs,
}

impl DeviceSignals {
    pub fn new(device_model: impl Into<String>, os: HostOs) -> Self {
        Self {
            device_model: device_model.into(),
            os,
        }
    }

    /// Signals for the machine this process runs on.
    ///
    /// Desktop hosts have no meaningful device model, so only the compile
    /// target's OS is consulted.
    pub fn detect() -> Self {
        let os = match std::env::consts::OS {
            "android" => HostOs::Android,
            "ios" => HostOs::Ios,
            _ => HostOs::Other,
        };
        Self::new(String::new(), os)
    }
}
