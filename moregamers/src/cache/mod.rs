//! Banner image caching.
//!
//! Images are cached per shape and keyed by the URL they were fetched from.
//! The controller checks membership before every insert, so a cached image
//! is never downloaded twice.

mod asset;
mod memory;

pub use asset::BannerImage;
pub use memory::{CacheStats, ImageCache};
