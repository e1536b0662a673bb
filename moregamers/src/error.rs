//! Banner pipeline errors.

use thiserror::Error;

use crate::provider::{ResponseError, TransportError};

/// Why a banner request did not produce a banner.
///
/// None of these are fatal to the controller: each one ends a single
/// pipeline run, is logged, and is reported to subscribers as
/// [`BannerFailed`](crate::events::BannerFailed).
#[derive(Debug, Error)]
pub enum BannerError {
    /// The metadata request failed.
    #[error("Metadata request failed: {0}")]
    Metadata(#[source] TransportError),

    /// The metadata body was unusable or reported an error.
    #[error(transparent)]
    Response(#[from] ResponseError),

    /// An image download failed.
    #[error("Image request for {url} failed: {source}")]
    Image {
        url: String,
        #[source]
        source: TransportError,
    },

    /// The controller was created outside a Tokio runtime.
    #[error("BannerController must be created inside a Tokio runtime")]
    NoRuntime,
}

impl BannerError {
    /// Whether the failure points at a broken ad server contract rather
    /// than a transient network or API condition.
    pub fn is_malformed_response(&self) -> bool {
        matches!(
            self,
            BannerError::Response(ResponseError::Malformed(_))
                | BannerError::Response(ResponseError::Json(_))
                | BannerError::Response(ResponseError::NotAnObject(_))
        )
    }
}
