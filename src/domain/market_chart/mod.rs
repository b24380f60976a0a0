//! Market chart domain — endpoint derivation and price series extraction.

pub mod convert;
pub mod endpoint;
pub mod wire;

pub use convert::extract_series;
pub use endpoint::EndpointBuilder;

/// Chronologically ordered price samples for one chart.
///
/// Rebuilt from scratch on every successful fetch, never appended to.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceSeries(Vec<f64>);

impl PriceSeries {
    pub fn new(prices: Vec<f64>) -> Self {
        Self(prices)
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<f64> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Most recent sample.
    pub fn latest(&self) -> Option<f64> {
        self.0.last().copied()
    }
}

impl From<Vec<f64>> for PriceSeries {
    fn from(prices: Vec<f64>) -> Self {
        Self(prices)
    }
}
