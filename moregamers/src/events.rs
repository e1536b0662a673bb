//! Banner event delivery.
//!
//! Two independent channels: [`BannerReady`] carries the click-through URL
//! and the image to show, [`BannerFailed`] carries nothing. Subscribers are
//! plain callbacks identified by a [`SubscriptionId`].
//!
//! # Delivery
//!
//! ```text
//! pipeline ──► EventBus::emit_ready() ──► snapshot of subscribers
//!                                             ├─► handler 1
//!                                             ├─► handler 2 (panics, logged)
//!                                             └─► handler 3
//! ```
//!
//! Emission is a synchronous fan-out over a snapshot taken under the read
//! lock, so handlers may subscribe or unsubscribe (even themselves) while
//! being called. A panicking handler is isolated from the others.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::warn;

use crate::cache::BannerImage;

/// A banner is ready to be displayed.
#[derive(Debug, Clone)]
pub struct BannerReady {
    /// Where a tap on the banner should lead.
    pub click_url: String,
    pub image: Arc<BannerImage>,
}

/// A banner request failed. No payload; details are in the log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BannerFailed;

/// Handle returned by a subscription, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

type Handler<E> = Arc<dyn Fn(&E) + Send + Sync>;

struct Channel<E> {
    name: &'static str,
    handlers: RwLock<Vec<(SubscriptionId, Handler<E>)>>,
}

impl<E> Channel<E> {
    fn new(name: &'static str) -> Self {
        Self {
            name,
            handlers: RwLock::new(Vec::new()),
        }
    }

    fn add(&self, id: SubscriptionId, handler: Handler<E>) {
        self.handlers.write().push((id, handler));
    }

    fn remove(&self, id: SubscriptionId) -> bool {
        let mut handlers = self.handlers.write();
        let before = handlers.len();
        handlers.retain(|(existing, _)| *existing != id);
        handlers.len() != before
    }

    fn len(&self) -> usize {
        self.handlers.read().len()
    }

    fn clear(&self) {
        self.handlers.write().clear();
    }

    fn emit(&self, event: &E) -> usize {
        let snapshot: Vec<(SubscriptionId, Handler<E>)> = self.handlers.read().clone();

        let mut delivered = 0;
        for (id, handler) in snapshot {
            match catch_unwind(AssertUnwindSafe(|| handler(event))) {
                Ok(()) => delivered += 1,
                Err(_) => {
                    warn!(channel = self.name, subscription = id.0, "Event handler panicked");
                }
            }
        }
        delivered
    }
}

/// Multicast registry for banner events.
pub struct EventBus {
    next_id: AtomicU64,
    ready: Channel<BannerReady>,
    failed: Channel<BannerFailed>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            ready: Channel::new("banner_ready"),
            failed: Channel::new("banner_failed"),
        }
    }

    fn next_id(&self) -> SubscriptionId {
        SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    /// Register a handler for [`BannerReady`].
    pub fn subscribe_ready<F>(&self, handler: F) -> SubscriptionId
    where
        F: Fn(&BannerReady) + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.ready.add(id, Arc::new(handler));
        id
    }

    /// Register a handler for [`BannerFailed`].
    pub fn subscribe_failed<F>(&self, handler: F) -> SubscriptionId
    where
        F: Fn(&BannerFailed) + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.failed.add(id, Arc::new(handler));
        id
    }

    /// Remove a subscription from whichever channel holds it.
    ///
    /// Returns `false` if the id is unknown or was already removed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        // Ids are unique across channels, so at most one of these matches.
        self.ready.remove(id) | self.failed.remove(id)
    }

    /// Number of (ready, failed) subscribers.
    pub fn subscriber_counts(&self) -> (usize, usize) {
        (self.ready.len(), self.failed.len())
    }

    /// Drop every subscription on both channels.
    pub fn clear(&self) {
        self.ready.clear();
        self.failed.clear();
    }

    /// Deliver a ready event; returns how many handlers completed normally.
    pub fn emit_ready(&self, event: &BannerReady) -> usize {
        self.ready.emit(event)
    }

    /// Deliver a failure event; returns how many handlers completed normally.
    pub fn emit_failed(&self) -> usize {
        self.failed.emit(&BannerFailed)
    }
}
