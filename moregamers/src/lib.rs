//! MoreGamers - cross-promotion banner fetching for games
//!
//! This library asks the MoreGamers ad server which banner to show for a
//! placement, downloads and caches the banner images, fires the tracking
//! pixel, and hands the result to the host through event handlers.
//!
//! ```ignore
//! use moregamers::{BannerConfig, BannerController, BannerShape, Platform};
//! use moregamers::provider::AsyncReqwestClient;
//!
//! let controller = BannerController::new(
//!     BannerConfig::new("my-game"),
//!     Platform::GooglePlay,
//!     AsyncReqwestClient::new()?,
//! )?;
//! controller.subscribe_ready(|banner| println!("click-through: {}", banner.click_url));
//! controller.request_banner(BannerShape::Square);
//! ```

pub mod cache;
pub mod config;
pub mod controller;
pub mod error;
pub mod events;
pub mod logging;
pub mod provider;
pub mod shape;
pub mod store;

pub use cache::BannerImage;
pub use config::BannerConfig;
pub use controller::{BannerController, RequestOutcome};
pub use error::BannerError;
pub use events::{BannerFailed, BannerReady, SubscriptionId};
pub use shape::BannerShape;
pub use store::Platform;

/// Library version, also reported to the ad server as `sdkVersion`.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
