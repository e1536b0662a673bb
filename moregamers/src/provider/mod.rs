//! Ad server access.
//!
//! This module holds everything that touches the wire: the HTTP client
//! abstraction, metadata URL construction and the metadata response model.
//!
//! # Example
//!
//! ```ignore
//! use moregamers::provider::{AdResponse, AsyncHttpClient, AsyncReqwestClient, MetadataEndpoint};
//!
//! let client = AsyncReqwestClient::new()?;
//! let endpoint = MetadataEndpoint::new(DEFAULT_BASE_URL, "my-game", Platform::Itunes, SDK_VERSION);
//! let body = client.get(&endpoint.url()).await?;
//! let ad = AdResponse::parse(&body)?;
//! ```

mod endpoint;
mod http;
mod response;
mod types;

pub use endpoint::{MetadataEndpoint, DEFAULT_BASE_URL, SDK_VERSION};
pub use http::{AsyncHttpClient, AsyncReqwestClient, DEFAULT_TIMEOUT_SECS};
pub use response::{check_error_field, parse_object, sanitize_body, AdResponse, ResponseError};
pub use types::TransportError;

#[cfg(test)]
pub use http::tests::MockAsyncHttpClient;
