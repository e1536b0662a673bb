//! Integration tests for the banner pipeline through the public API.
//!
//! These tests drive a controller end to end with an in-process ad server:
//! - metadata → image download → `BannerReady`
//! - secondary prefetch and the throttle window
//! - failure reporting and recovery
//!
//! Run with: `cargo test --test banner_flow`

use std::collections::HashMap;
use std::io::Cursor;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::mpsc;

use moregamers::provider::{AsyncHttpClient, TransportError};
use moregamers::{
    BannerConfig, BannerController, BannerReady, BannerShape, Platform, RequestOutcome,
};

// ============================================================================
// Helpers
// ============================================================================

const BASE_URL: &str = "http://promo.test/";

/// Routes requests to canned bodies and remembers what was asked for.
#[derive(Clone, Default)]
struct FakeAdServer {
    routes: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    hits: Arc<Mutex<Vec<String>>>,
}

impl FakeAdServer {
    fn route(&self, url: &str, body: impl Into<Vec<u8>>) {
        self.routes
            .lock()
            .unwrap()
            .insert(url.to_string(), body.into());
    }

    fn unroute(&self, url: &str) {
        self.routes.lock().unwrap().remove(url);
    }

    fn hits(&self, url: &str) -> usize {
        self.hits.lock().unwrap().iter().filter(|u| *u == url).count()
    }
}

impl AsyncHttpClient for FakeAdServer {
    async fn get(&self, url: &str) -> Result<Vec<u8>, TransportError> {
        self.hits.lock().unwrap().push(url.to_string());
        self.routes
            .lock()
            .unwrap()
            .get(url)
            .cloned()
            .ok_or_else(|| TransportError::HttpError(format!("HTTP 404 for {}", url)))
    }
}

fn png(width: u32, height: u32) -> Vec<u8> {
    let mut out = Cursor::new(Vec::new());
    image::RgbaImage::new(width, height)
        .write_to(&mut out, image::ImageFormat::Png)
        .unwrap();
    out.into_inner()
}

/// A metadata body in the double-encoded form the ad server uses.
fn metadata_body(landscape: &str, portrait: &str, click: &str) -> String {
    let inner = serde_json::json!({
        "error": "false",
        "image": "unused",
        "landscape_image": landscape,
        "portrait_image": portrait,
        "click": click,
        "tracking": format!("{}pixel", BASE_URL),
    });
    serde_json::to_string(&inner.to_string()).unwrap()
}

struct Harness {
    server: FakeAdServer,
    controller: BannerController<FakeAdServer>,
    ready: mpsc::UnboundedReceiver<BannerReady>,
    failed: mpsc::UnboundedReceiver<()>,
}

fn harness(platform: Platform) -> Harness {
    let server = FakeAdServer::default();
    let controller = BannerController::new(
        BannerConfig::new("puzzle-quest").with_base_url(BASE_URL),
        platform,
        server.clone(),
    )
    .unwrap();

    let (ready_tx, ready) = mpsc::unbounded_channel();
    controller.subscribe_ready(move |event| {
        let _ = ready_tx.send(event.clone());
    });
    let (failed_tx, failed) = mpsc::unbounded_channel();
    controller.subscribe_failed(move |_| {
        let _ = failed_tx.send(());
    });

    Harness {
        server,
        controller,
        ready,
        failed,
    }
}

// ============================================================================
// Integration Tests
// ============================================================================

#[tokio::test]
async fn test_banner_delivered_with_decodable_image() {
    let mut h = harness(Platform::Itunes);
    let metadata_url = h.controller.metadata_url();
    assert_eq!(
        metadata_url,
        "http://promo.test/ad?game=puzzle-quest&sdk=unity&platform=ios&sdkVersion=1.1.1"
    );

    h.server.route(
        &metadata_url,
        metadata_body("http://cdn.test/wide.png", "http://cdn.test/tall.png", "http://store.test/app"),
    );
    h.server.route("http://cdn.test/wide.png", png(320, 50));
    h.server.route("http://cdn.test/tall.png", png(300, 250));
    h.server.route("http://promo.test/pixel", Vec::new());

    h.controller
        .request_banner(BannerShape::Square)
        .finished()
        .await;

    let banner = h.ready.try_recv().unwrap();
    assert_eq!(banner.click_url, "http://store.test/app");
    assert_eq!(banner.image.dimensions(), Some((320, 50)));
    assert!(h.failed.try_recv().is_err());

    let prefetched = h
        .controller
        .cached_image(BannerShape::Rectangle, "http://cdn.test/tall.png")
        .unwrap();
    assert_eq!(prefetched.dimensions(), Some((300, 250)));

    h.controller.shutdown().await;
    assert_eq!(h.server.hits("http://promo.test/pixel"), 1);
}

#[tokio::test(start_paused = true)]
async fn test_shape_switch_within_window_uses_prefetched_image() {
    let mut h = harness(Platform::GooglePlay);
    let metadata_url = h.controller.metadata_url();
    h.server.route(
        &metadata_url,
        metadata_body("http://cdn.test/wide.png", "http://cdn.test/tall.png", "http://store.test/app"),
    );
    h.server.route("http://cdn.test/wide.png", png(4, 1));
    h.server.route("http://cdn.test/tall.png", png(1, 4));
    h.server.route("http://promo.test/pixel", Vec::new());

    h.controller
        .request_banner(BannerShape::Square)
        .finished()
        .await;
    let square = h.ready.try_recv().unwrap();

    tokio::time::advance(Duration::from_secs(5)).await;

    let outcome = h.controller.request_banner(BannerShape::Rectangle);
    assert!(matches!(outcome, RequestOutcome::Throttled));
    let rectangle = h.ready.try_recv().unwrap();
    assert_eq!(rectangle.click_url, square.click_url);
    assert_eq!(rectangle.image.url(), "http://cdn.test/tall.png");
    assert_eq!(h.server.hits(&metadata_url), 1);

    h.controller.shutdown().await;
}

#[tokio::test]
async fn test_failure_then_recovery() {
    let mut h = harness(Platform::Amazon);
    let metadata_url = h.controller.metadata_url();
    h.server.route(
        &metadata_url,
        metadata_body("http://cdn.test/wide.png", "http://cdn.test/tall.png", "http://store.test/app"),
    );

    // Images are not reachable yet.
    h.controller
        .request_banner(BannerShape::Square)
        .finished()
        .await;
    assert!(h.failed.try_recv().is_ok());
    assert!(h.ready.try_recv().is_err());
    assert!(!h.controller.is_in_flight());

    h.server.route("http://cdn.test/wide.png", png(2, 2));
    h.server.route("http://cdn.test/tall.png", png(2, 2));
    h.server.route("http://promo.test/pixel", Vec::new());

    let outcome = h.controller.request_banner(BannerShape::Square);
    assert!(outcome.is_started());
    outcome.finished().await;

    assert!(h.ready.try_recv().is_ok());
    assert!(h.failed.try_recv().is_err());

    h.controller.shutdown().await;
}

#[tokio::test]
async fn test_server_reported_error() {
    let mut h = harness(Platform::None);
    let metadata_url = h.controller.metadata_url();
    h.server.route(
        &metadata_url,
        r#"{"error":"true","message":"unknown game"}"#,
    );

    h.controller
        .request_banner(BannerShape::Rectangle)
        .finished()
        .await;

    assert!(h.failed.try_recv().is_ok());
    assert!(h.failed.try_recv().is_err());
    assert_eq!(h.server.hits(&metadata_url), 1);

    h.server.unroute(&metadata_url);
    h.controller.shutdown().await;
}

#[tokio::test]
async fn test_shutdown_silences_controller() {
    let mut h = harness(Platform::Windows);
    h.controller.shutdown().await;

    assert!(matches!(
        h.controller.request_banner(BannerShape::Square),
        RequestOutcome::Closed
    ));
    assert!(h.ready.try_recv().is_err());
    assert_eq!(h.server.hits(&h.controller.metadata_url()), 0);
}
