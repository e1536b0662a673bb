//! Append-only in-memory image cache.
//!
//! One map per [`BannerShape`], keyed by image URL. Entries are never
//! replaced or evicted for the lifetime of the cache.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use super::asset::BannerImage;
use crate::shape::BannerShape;

/// Point-in-time cache statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub square_entries: usize,
    pub rectangle_entries: usize,
    pub hits: u64,
    pub misses: u64,
}

/// Two independent URL → image maps, one per banner shape.
#[derive(Debug, Default)]
pub struct ImageCache {
    squares: DashMap<String, Arc<BannerImage>>,
    rectangles: DashMap<String, Arc<BannerImage>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl ImageCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn map(&self, shape: BannerShape) -> &DashMap<String, Arc<BannerImage>> {
        match shape {
            BannerShape::Square => &self.squares,
            BannerShape::Rectangle => &self.rectangles,
        }
    }

    /// Look up an image in the shape's map.
    pub fn get(&self, shape: BannerShape, url: &str) -> Option<Arc<BannerImage>> {
        match self.map(shape).get(url) {
            Some(entry) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                Some(Arc::clone(entry.value()))
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    pub fn contains(&self, shape: BannerShape, url: &str) -> bool {
        self.map(shape).contains_key(url)
    }

    /// Insert an image under `url`.
    ///
    /// An existing entry is never overwritten; returns `false` (and leaves
    /// the original in place) if the key was already present.
    pub fn insert(
        &self,
        shape: BannerShape,
        url: impl Into<String>,
        image: Arc<BannerImage>,
    ) -> bool {
        match self.map(shape).entry(url.into()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(image);
                true
            }
        }
    }

    pub fn len(&self, shape: BannerShape) -> usize {
        self.map(shape).len()
    }

    pub fn is_empty(&self, shape: BannerShape) -> bool {
        self.map(shape).is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            square_entries: self.squares.len(),
            rectangle_entries: self.rectangles.len(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}
