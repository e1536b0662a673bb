//! The banner controller and its fetch pipeline.

use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio_util::task::TaskTracker;
use tracing::{debug, error, info, trace, warn};

use super::flight::{FlightPermit, SingleFlight};
use super::state::DeliveryState;
use crate::cache::{BannerImage, CacheStats, ImageCache};
use crate::config::BannerConfig;
use crate::error::BannerError;
use crate::events::{BannerFailed, BannerReady, EventBus, SubscriptionId};
use crate::provider::{AdResponse, AsyncHttpClient, MetadataEndpoint};
use crate::shape::BannerShape;
use crate::store::Platform;

/// What [`BannerController::request_banner`] did with a request.
#[derive(Debug)]
pub enum RequestOutcome {
    /// A pipeline run was spawned. The handle resolves once the run has
    /// reached a terminal state; awaiting it is optional.
    Started(JoinHandle<()>),
    /// Another run is in flight. The request was dropped; no event fires.
    Coalesced,
    /// The last banner was replayed from memory; `BannerReady` has already
    /// been emitted.
    Throttled,
    /// No placement ID is configured. Nothing was fetched and no event fires.
    Misconfigured,
    /// The controller has been shut down.
    Closed,
}

impl RequestOutcome {
    pub fn is_started(&self) -> bool {
        matches!(self, RequestOutcome::Started(_))
    }

    /// Wait for a started run to finish. Returns immediately otherwise.
    pub async fn finished(self) {
        if let RequestOutcome::Started(handle) = self {
            if let Err(e) = handle.await {
                warn!(error = %e, "Banner pipeline task ended abnormally");
            }
        }
    }
}

struct Inner<C> {
    config: BannerConfig,
    endpoint: MetadataEndpoint,
    client: C,
    runtime: Handle,
    flight: Arc<SingleFlight>,
    /// Read-locked by `request_banner` until its run is spawned,
    /// write-locked by `shutdown`.
    closed: RwLock<bool>,
    state: Mutex<DeliveryState>,
    cache: ImageCache,
    events: EventBus,
    tasks: TaskTracker,
}

/// Fetches, caches and announces ad banners.
///
/// Cheap to clone; all clones drive the same controller. The host creates
/// exactly one per placement and calls [`shutdown`](Self::shutdown) when done.
///
/// ```ignore
/// let client = AsyncReqwestClient::new()?;
/// let controller = BannerController::new(BannerConfig::new("my-game"), Platform::Itunes, client)?;
///
/// controller.subscribe_ready(|banner| show(&banner.click_url, &banner.image));
/// controller.subscribe_failed(|_| hide());
///
/// controller.request_banner(BannerShape::Square);
/// ```
pub struct BannerController<C: AsyncHttpClient> {
    inner: Arc<Inner<C>>,
}

impl<C: AsyncHttpClient> Clone for BannerController<C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<C: AsyncHttpClient> BannerController<C> {
    /// Create a controller bound to the current Tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns [`BannerError::NoRuntime`] if called outside a runtime.
    pub fn new(config: BannerConfig, platform: Platform, client: C) -> Result<Self, BannerError> {
        let runtime = Handle::try_current().map_err(|_| BannerError::NoRuntime)?;
        Ok(Self::with_runtime(config, platform, client, runtime))
    }

    /// Create a controller that spawns its work on `runtime`.
    ///
    /// `request_banner` may then be called from any thread, including ones
    /// outside the runtime.
    pub fn with_runtime(
        config: BannerConfig,
        platform: Platform,
        client: C,
        runtime: Handle,
    ) -> Self {
        let endpoint = MetadataEndpoint::new(
            config.base_url.clone(),
            config.placement_id.trim(),
            platform,
            config.sdk_version.clone(),
        );

        info!(
            placement = endpoint.placement_id(),
            platform = %platform,
            refresh_window_secs = config.refresh_window.as_secs(),
            "Banner controller created"
        );

        Self {
            inner: Arc::new(Inner {
                config,
                endpoint,
                client,
                runtime,
                flight: SingleFlight::new(),
                closed: RwLock::new(false),
                state: Mutex::new(DeliveryState::default()),
                cache: ImageCache::new(),
                events: EventBus::new(),
                tasks: TaskTracker::new(),
            }),
        }
    }

    /// Request a banner of the given shape.
    ///
    /// Never blocks on the network. If a run is already in flight the
    /// request is dropped. Within the refresh window of the last delivered
    /// banner, that banner is replayed synchronously before this returns.
    /// Otherwise a pipeline run is spawned and the result arrives through
    /// the subscribed handlers.
    pub fn request_banner(&self, shape: BannerShape) -> RequestOutcome {
        let inner = &self.inner;

        // Held until the run is on the tracker.
        let closed = inner.closed.read();
        if *closed {
            debug!(shape = %shape, "Banner requested after shutdown");
            return RequestOutcome::Closed;
        }

        let Some(permit) = inner.flight.try_acquire() else {
            trace!(shape = %shape, "Banner request coalesced into in-flight run");
            return RequestOutcome::Coalesced;
        };

        if !inner.config.has_placement() {
            error!("No MoreGamers placement ID configured; banner request ignored");
            return RequestOutcome::Misconfigured;
        }

        let replay = inner
            .state
            .lock()
            .replay(shape, inner.config.refresh_window);
        if let Some((click_url, image)) = replay {
            debug!(shape = %shape, url = image.url(), "Serving banner from throttle window");
            drop(closed);
            inner.deliver(shape, click_url, image);
            drop(permit);
            return RequestOutcome::Throttled;
        }

        let run = Arc::clone(inner);
        let handle = inner
            .tasks
            .spawn_on(async move { run.run(shape, permit).await }, &inner.runtime);
        RequestOutcome::Started(handle)
    }

    /// Register a handler for delivered banners.
    pub fn subscribe_ready<F>(&self, handler: F) -> SubscriptionId
    where
        F: Fn(&BannerReady) + Send + Sync + 'static,
    {
        self.inner.events.subscribe_ready(handler)
    }

    /// Register a handler for failed requests.
    pub fn subscribe_failed<F>(&self, handler: F) -> SubscriptionId
    where
        F: Fn(&BannerFailed) + Send + Sync + 'static,
    {
        self.inner.events.subscribe_failed(handler)
    }

    /// Remove a handler. Idempotent.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.inner.events.unsubscribe(id)
    }

    /// Whether a pipeline run is currently active.
    pub fn is_in_flight(&self) -> bool {
        self.inner.flight.is_busy()
    }

    pub fn is_closed(&self) -> bool {
        *self.inner.closed.read()
    }

    pub fn platform(&self) -> Platform {
        self.inner.endpoint.platform()
    }

    pub fn config(&self) -> &BannerConfig {
        &self.inner.config
    }

    /// The metadata URL this controller requests.
    pub fn metadata_url(&self) -> String {
        self.inner.endpoint.url()
    }

    /// A cached image, if one was downloaded for `shape` from `url`.
    pub fn cached_image(&self, shape: BannerShape, url: &str) -> Option<Arc<BannerImage>> {
        self.inner.cache.get(shape, url)
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.inner.cache.stats()
    }

    /// Stop accepting requests and wait for outstanding work.
    ///
    /// Subscribers are dropped immediately, so a run still in flight
    /// completes silently. Tracking pings already sent are awaited.
    /// Calling this more than once is harmless.
    pub async fn shutdown(&self) {
        {
            let mut closed = self.inner.closed.write();
            if *closed {
                return;
            }
            *closed = true;
        }

        info!("Banner controller shutting down");
        self.inner.events.clear();
        self.inner.tasks.close();
        self.inner.tasks.wait().await;
        debug!("Banner controller shut down");
    }

    /// Wait until every spawned task, tracking pings included, has finished.
    #[cfg(test)]
    pub(crate) async fn settle(&self) {
        self.inner.tasks.close();
        self.inner.tasks.wait().await;
        self.inner.tasks.reopen();
    }
}

impl<C: AsyncHttpClient> Inner<C> {
    /// One pipeline run. The permit is released when this returns.
    async fn run(self: Arc<Self>, shape: BannerShape, _permit: FlightPermit) {
        if let Err(e) = self.fetch(shape).await {
            if e.is_malformed_response() {
                error!(shape = %shape, error = %e, "Ad server returned an unusable response");
            } else {
                warn!(shape = %shape, error = %e, "Banner request failed");
            }
            self.events.emit_failed();
        }
    }

    async fn fetch(self: &Arc<Self>, shape: BannerShape) -> Result<(), BannerError> {
        let metadata_url = self.endpoint.url();
        trace!(url = %metadata_url, "Requesting ad metadata");
        let body = self
            .client
            .get(&metadata_url)
            .await
            .map_err(BannerError::Metadata)?;

        let ad = AdResponse::parse(&body)?;

        let primary_url = ad.image_url_for(shape);
        if let Some(cached) = self.cache.get(shape, primary_url) {
            debug!(shape = %shape, url = primary_url, "Banner image served from cache");
            self.state.lock().record(shape, &ad.click_url, Arc::clone(&cached));
            self.deliver(shape, ad.click_url.clone(), cached);
            return Ok(());
        }

        let primary = self.download(primary_url).await?;
        self.cache.insert(shape, primary_url, Arc::clone(&primary));
        self.state.lock().record(shape, &ad.click_url, Arc::clone(&primary));
        self.spawn_tracking(ad.tracking_url.clone());
        self.deliver(shape, ad.click_url.clone(), primary);

        // Prefetch the opposite orientation for the other shape.
        let other = shape.opposite();
        let secondary_url = ad.image_url_for(other);
        let secondary = match self.cache.get(other, secondary_url) {
            Some(cached) => cached,
            None => {
                let image = self.download(secondary_url).await?;
                self.cache.insert(other, secondary_url, Arc::clone(&image));
                image
            }
        };
        self.state.lock().set_last_image(other, secondary);

        Ok(())
    }

    async fn download(&self, url: &str) -> Result<Arc<BannerImage>, BannerError> {
        trace!(url = url, "Downloading banner image");
        let bytes = self
            .client
            .get(url)
            .await
            .map_err(|source| BannerError::Image {
                url: url.to_string(),
                source,
            })?;
        Ok(Arc::new(BannerImage::new(url, bytes)))
    }

    fn deliver(&self, shape: BannerShape, click_url: String, image: Arc<BannerImage>) {
        info!(
            shape = %shape,
            url = image.url(),
            bytes = image.len(),
            "Banner ready"
        );
        self.events.emit_ready(&BannerReady { click_url, image });
    }

    /// Fire the tracking pixel. The outcome is only logged.
    fn spawn_tracking(self: &Arc<Self>, url: String) {
        let inner = Arc::clone(self);
        self.tasks.spawn_on(
            async move {
                match inner.client.get(&url).await {
                    Ok(_) => debug!(url = %url, "Tracking ping sent"),
                    Err(e) => debug!(url = %url, error = %e, "Tracking ping failed"),
                }
            },
            &self.runtime,
        );
    }
}
