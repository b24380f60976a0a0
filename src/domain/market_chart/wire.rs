//! Wire types for the market chart REST response.

use serde::Deserialize;

/// `GET /{symbol}/market_chart` body.
///
/// Only `prices` is required; `market_caps` and `total_volumes` are ignored.
#[derive(Deserialize, Debug, Clone)]
pub struct MarketChartResponse {
    /// `[timestamp_ms, price]` pairs in chronological order.
    pub prices: Vec<(f64, f64)>,
}
