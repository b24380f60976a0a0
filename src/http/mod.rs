//! HTTP layer — the transport seam and its reqwest implementation.

#[cfg(feature = "http")]
pub mod client;

#[cfg(feature = "http")]
pub use client::ChartHttp;

use std::future::Future;
use std::pin::Pin;

use crate::error::HttpError;
use crate::shared::Endpoint;

/// Boxed future returned by [`MarketChartSource::fetch_market_chart`].
pub type SourceFuture<'a> =
    Pin<Box<dyn Future<Output = Result<serde_json::Value, HttpError>> + Send + 'a>>;

/// Transport contract: fetch the raw JSON body for an endpoint.
///
/// Non-2xx statuses and transport failures are reported as `HttpError`;
/// shape validation happens later in the transformer.
pub trait MarketChartSource: Send + Sync {
    fn fetch_market_chart<'a>(&'a self, endpoint: &'a Endpoint) -> SourceFuture<'a>;
}
