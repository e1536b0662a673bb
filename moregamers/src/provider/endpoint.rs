//! Metadata endpoint URL construction.

use crate::store::Platform;

/// Production ad server.
pub const DEFAULT_BASE_URL: &str = "https://app.moregamers.com/";

/// SDK version reported to the ad server.
pub const SDK_VERSION: &str = "1.1.1";

/// Builds metadata request URLs for one placement.
///
/// The base URL is used verbatim, so it must end with a slash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataEndpoint {
    base_url: String,
    placement_id: String,
    platform: Platform,
    sdk_version: String,
}

impl MetadataEndpoint {
    pub fn new(
        base_url: impl Into<String>,
        placement_id: impl Into<String>,
        platform: Platform,
        sdk_version: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            placement_id: placement_id.into(),
            platform,
            sdk_version: sdk_version.into(),
        }
    }

    pub fn placement_id(&self) -> &str {
        &self.placement_id
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    /// The metadata URL:
    /// `{base}ad?game={id}&sdk=unity&platform={store}&sdkVersion={ver}`.
    pub fn url(&self) -> String {
        format!(
            "{}ad?game={}&sdk=unity&platform={}&sdkVersion={}",
            self.base_url,
            self.placement_id,
            self.platform.as_str(),
            self.sdk_version
        )
    }
}
