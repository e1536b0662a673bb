//! Downloaded banner images.

use std::io::Cursor;

use bytes::Bytes;
use image::ImageReader;

/// A banner image as downloaded from the ad server.
///
/// The bytes are kept encoded (PNG/JPEG as served); decoding is left to the
/// host's renderer. Instances are shared via `Arc` between the cache, the
/// controller's last-delivered snapshot and event subscribers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BannerImage {
    url: String,
    bytes: Bytes,
}

impl BannerImage {
    pub fn new(url: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            url: url.into(),
            bytes: bytes.into(),
        }
    }

    /// URL the image was fetched from (its cache key).
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Encoded image data.
    pub fn bytes(&self) -> &Bytes {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Pixel dimensions read from the image header.
    ///
    /// Returns `None` if the format can't be recognized or the header is
    /// corrupt.
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        ImageReader::new(Cursor::new(self.bytes.as_ref()))
            .with_guessed_format()
            .ok()?
            .into_dimensions()
            .ok()
    }
}
