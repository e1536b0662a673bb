//! Last-delivered snapshot used by the throttle fast path.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;

use crate::cache::BannerImage;
use crate::shape::BannerShape;

/// When the last banner went out and where it pointed.
///
/// Timestamp and click URL live in one value so they can only ever be
/// updated together.
#[derive(Debug, Clone)]
pub(crate) struct LastDelivery {
    pub(crate) at: Instant,
    pub(crate) click_url: String,
}

#[derive(Debug, Default)]
pub(crate) struct DeliveryState {
    last_delivery: Option<LastDelivery>,
    last_square: Option<Arc<BannerImage>>,
    last_rectangle: Option<Arc<BannerImage>>,
}

impl DeliveryState {
    /// Record a banner delivered to subscribers.
    pub(crate) fn record(
        &mut self,
        shape: BannerShape,
        click_url: &str,
        image: Arc<BannerImage>,
    ) {
        self.last_delivery = Some(LastDelivery {
            at: Instant::now(),
            click_url: click_url.to_string(),
        });
        self.set_last_image(shape, image);
    }

    pub(crate) fn set_last_image(&mut self, shape: BannerShape, image: Arc<BannerImage>) {
        match shape {
            BannerShape::Square => self.last_square = Some(image),
            BannerShape::Rectangle => self.last_rectangle = Some(image),
        }
    }

    pub(crate) fn last_image(&self, shape: BannerShape) -> Option<&Arc<BannerImage>> {
        match shape {
            BannerShape::Square => self.last_square.as_ref(),
            BannerShape::Rectangle => self.last_rectangle.as_ref(),
        }
    }

    pub(crate) fn last_delivery(&self) -> Option<&LastDelivery> {
        self.last_delivery.as_ref()
    }

    /// The banner to replay if the last delivery is younger than `window`.
    ///
    /// Returns `None` when nothing was delivered yet, the last delivery had
    /// no click URL, the window has passed, or no image was ever delivered
    /// for `shape`; the caller then goes to the network.
    pub(crate) fn replay(
        &self,
        shape: BannerShape,
        window: Duration,
    ) -> Option<(String, Arc<BannerImage>)> {
        let last = self.last_delivery.as_ref()?;
        if last.click_url.is_empty() || last.at.elapsed() >= window {
            return None;
        }
        let image = self.last_image(shape)?;
        Some((last.click_url.clone(), Arc::clone(image)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: Duration = Duration::from_secs(20);

    fn image(url: &str) -> Arc<BannerImage> {
        Arc::new(BannerImage::new(url, vec![0u8; 4]))
    }

    #[test]
    fn test_empty_state_never_replays() {
        let state = DeliveryState::default();
        assert!(state.replay(BannerShape::Square, WINDOW).is_none());
        assert!(state.last_delivery().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_replay_within_window() {
        let mut state = DeliveryState::default();
        let square = image("L1");
        state.record(BannerShape::Square, "C", Arc::clone(&square));

        tokio::time::advance(Duration::from_secs(19)).await;

        let (click, replayed) = state.replay(BannerShape::Square, WINDOW).unwrap();
        assert_eq!(click, "C");
        assert!(Arc::ptr_eq(&replayed, &square));
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_replay_after_window() {
        let mut state = DeliveryState::default();
        state.record(BannerShape::Square, "C", image("L1"));

        tokio::time::advance(WINDOW).await;

        assert!(state.replay(BannerShape::Square, WINDOW).is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_replay_without_click_url() {
        let mut state = DeliveryState::default();
        state.record(BannerShape::Square, "", image("L1"));

        assert!(state.last_delivery().is_some());
        assert!(state.replay(BannerShape::Square, WINDOW).is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_replay_for_shape_never_delivered() {
        let mut state = DeliveryState::default();
        state.record(BannerShape::Square, "C", image("L1"));

        assert!(state.replay(BannerShape::Rectangle, WINDOW).is_none());

        state.set_last_image(BannerShape::Rectangle, image("P1"));
        let (click, replayed) = state.replay(BannerShape::Rectangle, WINDOW).unwrap();
        assert_eq!(click, "C");
        assert_eq!(replayed.url(), "P1");
    }

    #[tokio::test(start_paused = true)]
    async fn test_record_updates_timestamp_and_click_together() {
        let mut state = DeliveryState::default();
        state.record(BannerShape::Square, "C1", image("L1"));
        let first = state.last_delivery().unwrap().at;

        tokio::time::advance(Duration::from_secs(5)).await;
        state.record(BannerShape::Rectangle, "C2", image("P1"));

        let last = state.last_delivery().unwrap();
        assert_eq!(last.click_url, "C2");
        assert_eq!(last.at - first, Duration::from_secs(5));
    }
}
