//! Banner fetch & cache controller.
//!
//! # Pipeline
//!
//! ```text
//! request_banner(shape)
//!   │
//!   ├─ run in flight? ─────────────────────────────► Coalesced (dropped)
//!   ├─ no placement ID? ───────────────────────────► Misconfigured (silent)
//!   ├─ inside refresh window? ─► BannerReady(last) ─► Throttled
//!   │
//!   └─ spawn ─► GET metadata ─► sanitize + parse
//!                 │
//!                 ├─ primary image cached? ─► BannerReady(cached), done
//!                 │
//!                 ├─ GET primary image ─► cache ─► tracking ping (background)
//!                 │                              └► BannerReady(primary)
//!                 └─ GET secondary image ─► cache for the opposite shape
//! ```
//!
//! Any failure after the spawn emits `BannerFailed` and ends the run. The
//! single-flight guard is released on every exit path.
//!
//! Square banners use the landscape image and prefetch the portrait one;
//! rectangles do the reverse.

mod banner;
mod flight;
mod state;


pub use banner::{BannerController, RequestOutcome};
