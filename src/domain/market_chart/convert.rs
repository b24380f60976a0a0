//! Conversion: provider payload → `PriceSeries`.

use serde::Deserialize;

use super::wire::MarketChartResponse;
use super::PriceSeries;
use crate::error::FetchError;

impl From<MarketChartResponse> for PriceSeries {
    fn from(resp: MarketChartResponse) -> Self {
        PriceSeries::new(resp.prices.into_iter().map(|(_, price)| price).collect())
    }
}

/// Extract the price of each `[timestamp, price]` pair, preserving order.
pub fn extract_series(payload: &serde_json::Value) -> Result<PriceSeries, FetchError> {
    let resp = MarketChartResponse::deserialize(payload)
        .map_err(|e| FetchError::MalformedResponse(e.to_string()))?;
    Ok(resp.into())
}
