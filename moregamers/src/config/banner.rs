//! Runtime configuration for the banner controller.

use std::time::Duration;

use crate::provider::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS, SDK_VERSION};

/// Default throttle window: within this long after a delivered banner the
/// controller serves the last result instead of asking the ad server again.
pub const DEFAULT_REFRESH_WINDOW: Duration = Duration::from_secs(20);

/// Configuration for a [`BannerController`](crate::controller::BannerController).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BannerConfig {
    /// Placement (game) identifier issued by MoreGamers. Required.
    pub placement_id: String,

    /// Ad server base URL, including the trailing slash.
    pub base_url: String,

    /// Version reported in the `sdkVersion` query parameter.
    pub sdk_version: String,

    /// Throttle window between network fetches.
    pub refresh_window: Duration,

    /// Per-request HTTP timeout in seconds, used by the default client.
    pub request_timeout_secs: u64,
}

impl BannerConfig {
    /// Create a config for the given placement with default endpoint settings.
    pub fn new(placement_id: impl Into<String>) -> Self {
        Self {
            placement_id: placement_id.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            sdk_version: SDK_VERSION.to_string(),
            refresh_window: DEFAULT_REFRESH_WINDOW,
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Set the ad server base URL. A trailing slash is added if missing.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        self.base_url = base_url;
        self
    }

    pub fn with_sdk_version(mut self, version: impl Into<String>) -> Self {
        self.sdk_version = version.into();
        self
    }

    pub fn with_refresh_window(mut self, window: Duration) -> Self {
        self.refresh_window = window;
        self
    }

    pub fn with_request_timeout_secs(mut self, secs: u64) -> Self {
        self.request_timeout_secs = secs;
        self
    }

    /// Whether a placement ID has been provided.
    pub fn has_placement(&self) -> bool {
        !self.placement_id.trim().is_empty()
    }
}
