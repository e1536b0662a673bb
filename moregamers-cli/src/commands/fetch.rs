//! `moregamers fetch`: request one banner and save its image.

use std::path::{Path, PathBuf};

use clap::Args;
use moregamers::provider::AsyncReqwestClient;
use moregamers::{
    BannerConfig, BannerController, BannerImage, BannerReady, BannerShape, Platform,
    RequestOutcome,
};
use tokio::sync::mpsc;
use tracing::{debug, info};

use super::common::{load_config, resolve_platform, ShapeArg};
use crate::error::CliError;

/// Arguments for the fetch command.
#[derive(Debug, Args)]
pub struct FetchArgs {
    /// Banner slot to fill
    #[arg(long, value_enum, default_value = "square")]
    pub shape: ShapeArg,

    /// Placement ID (overrides [banner] placement_id)
    #[arg(long)]
    pub placement: Option<String>,

    /// Store tag: development, ios, amazon, android, windows, blackberry
    #[arg(long)]
    pub platform: Option<Platform>,

    /// Config file (default: ~/.moregamers/config.ini)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Where to write the image (default: file name from the image URL)
    #[arg(long)]
    pub output: Option<PathBuf>,
}

enum Event {
    Ready(BannerReady),
    Failed,
}

/// Run the fetch command.
pub async fn run(args: FetchArgs) -> Result<(), CliError> {
    let config_file = load_config(args.config.as_deref())?;
    let platform = resolve_platform(args.platform, &config_file);

    let mut config = config_file.banner;
    if let Some(placement) = args.placement {
        config.placement_id = placement;
    }
    if !config.has_placement() {
        return Err(CliError::Config(
            "No placement ID. Set placement_id in [banner] or pass --placement".to_string(),
        ));
    }

    let banner = fetch_one(config, platform, args.shape.into()).await?;

    let output = args
        .output
        .unwrap_or_else(|| default_output(banner.image.url(), args.shape.into()));
    write_image(&banner.image, &output)?;

    println!("Click URL: {}", banner.click_url);
    println!("Image:     {}", banner.image.url());
    println!("Saved to:  {}", output.display());
    match banner.image.dimensions() {
        Some((w, h)) => println!("Size:      {}x{} ({} bytes)", w, h, banner.image.len()),
        None => println!("Size:      {} bytes (unrecognized format)", banner.image.len()),
    }

    Ok(())
}

/// Drive one request and wait for its first event.
async fn fetch_one(
    config: BannerConfig,
    platform: Platform,
    shape: BannerShape,
) -> Result<BannerReady, CliError> {
    let client =
        AsyncReqwestClient::with_timeout(config.request_timeout_secs).map_err(CliError::Client)?;
    let controller =
        BannerController::new(config, platform, client).map_err(CliError::Controller)?;
    info!(url = %controller.metadata_url(), "Fetching banner");

    let (tx, mut rx) = mpsc::unbounded_channel();
    let ready_tx = tx.clone();
    controller.subscribe_ready(move |banner| {
        let _ = ready_tx.send(Event::Ready(banner.clone()));
    });
    controller.subscribe_failed(move |_| {
        let _ = tx.send(Event::Failed);
    });

    let outcome = controller.request_banner(shape);
    debug!(outcome = ?outcome, "Banner requested");
    let early_exit = match outcome {
        RequestOutcome::Started(_) | RequestOutcome::Throttled => None,
        RequestOutcome::Coalesced => Some("another request is in flight"),
        RequestOutcome::Misconfigured => Some("no placement ID configured"),
        RequestOutcome::Closed => Some("controller is shut down"),
    };

    let event = match early_exit {
        Some(reason) => Err(CliError::NoBanner(reason)),
        None => match rx.recv().await {
            Some(Event::Ready(banner)) => Ok(banner),
            Some(Event::Failed) => Err(CliError::Failed),
            None => Err(CliError::NoBanner("the controller dropped its handlers")),
        },
    };

    // Lets the prefetch and the tracking ping finish before the runtime exits.
    controller.shutdown().await;
    event
}

/// File name taken from the last path segment of the image URL.
fn default_output(image_url: &str, shape: BannerShape) -> PathBuf {
    let path = image_url.split(['?', '#']).next().unwrap_or_default();
    match path.rsplit('/').next() {
        Some(name) if !name.is_empty() => PathBuf::from(name),
        _ => PathBuf::from(format!("banner-{}.img", shape)),
    }
}

fn write_image(image: &BannerImage, path: &Path) -> Result<(), CliError> {
    std::fs::write(path, image.bytes()).map_err(|error| CliError::FileWrite {
        path: path.display().to_string(),
        error,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_output_uses_url_file_name() {
        assert_eq!(
            default_output("https://cdn.moregamers.com/img/wide.png", BannerShape::Square),
            PathBuf::from("wide.png")
        );
        assert_eq!(
            default_output("https://cdn.test/a/tall.jpg?v=3#x", BannerShape::Rectangle),
            PathBuf::from("tall.jpg")
        );
    }

    #[test]
    fn test_default_output_fallback() {
        assert_eq!(
            default_output("https://cdn.test/", BannerShape::Rectangle),
            PathBuf::from("banner-rectangle.img")
        );
        assert_eq!(
            default_output("", BannerShape::Square),
            PathBuf::from("banner-square.img")
        );
    }

    #[test]
    fn test_write_image() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("banner.png");
        let image = BannerImage::new("https://cdn.test/banner.png", b"png-bytes".to_vec());

        write_image(&image, &path).unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), b"png-bytes");
    }

    #[test]
    fn test_write_image_into_missing_directory() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("missing").join("banner.png");
        let image = BannerImage::new("u", vec![1u8]);

        assert!(matches!(
            write_image(&image, &path),
            Err(CliError::FileWrite { .. })
        ));
    }

    #[tokio::test]
    async fn test_missing_placement_is_reported() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.ini");
        std::fs::write(&path, "[network]\ntimeout = 5\n").unwrap();

        let args = FetchArgs {
            shape: ShapeArg::Square,
            placement: None,
            platform: Some(Platform::None),
            config: Some(path),
            output: None,
        };

        assert!(matches!(run(args).await, Err(CliError::Config(_))));
    }
}
