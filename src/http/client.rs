//! Low-level HTTP client — `ChartHttp`.

use std::time::Duration;

use reqwest::header::RETRY_AFTER;
use reqwest::Client;

use super::{MarketChartSource, SourceFuture};
use crate::error::HttpError;
use crate::shared::Endpoint;

/// reqwest-backed market chart transport.
#[derive(Debug, Clone)]
pub struct ChartHttp {
    client: Client,
}

impl Default for ChartHttp {
    fn default() -> Self {
        Self::new(Duration::from_millis(
            crate::network::DEFAULT_REQUEST_TIMEOUT_MS,
        ))
    }
}

impl ChartHttp {
    pub fn new(timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("coinchart/", env!("CARGO_PKG_VERSION")))
            .pool_max_idle_per_host(4)
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!("Falling back to default HTTP client: {}", e);
                Client::new()
            });
        Self { client }
    }

    /// Use a preconfigured reqwest client.
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    pub async fn get_market_chart(
        &self,
        endpoint: &Endpoint,
    ) -> Result<serde_json::Value, HttpError> {
        let resp = self.client.get(endpoint.as_str()).send().await?;
        let status = resp.status().as_u16();

        if resp.status().is_success() {
            let text = resp.text().await?;
            return serde_json::from_str(&text).map_err(|e| HttpError::Decode(e.to_string()));
        }

        let retry_after = resp
            .headers()
            .get(RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        let body_text = resp.text().await.unwrap_or_default();

        Err(status_error(status, body_text, retry_after.as_deref()))
    }
}

impl MarketChartSource for ChartHttp {
    fn fetch_market_chart<'a>(&'a self, endpoint: &'a Endpoint) -> SourceFuture<'a> {
        Box::pin(self.get_market_chart(endpoint))
    }
}

/// Classify a non-2xx response.
fn status_error(status: u16, body: String, retry_after: Option<&str>) -> HttpError {
    match status {
        404 => HttpError::NotFound(body),
        429 => HttpError::RateLimited {
            retry_after_ms: retry_after
                .and_then(|v| v.trim().parse::<u64>().ok())
                .map(|secs| secs.saturating_mul(1000)),
        },
        400..=499 => HttpError::BadRequest(body),
        _ => HttpError::ServerError { status, body },
    }
}
