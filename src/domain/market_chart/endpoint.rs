//! Endpoint derivation — `FilterState` → request URL.

use crate::domain::filter::FilterState;
use crate::shared::Endpoint;

/// Builds the provider's market chart URL from a filter selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointBuilder {
    base_url: String,
}

impl Default for EndpointBuilder {
    fn default() -> Self {
        Self::new(crate::network::DEFAULT_API_URL)
    }
}

impl EndpointBuilder {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `{base}/{symbol}/market_chart?vs_currency={market}&days={days}&interval={interval}`
    ///
    /// Values are percent-encoded so distinct selections never collide.
    pub fn build(&self, state: &FilterState) -> Endpoint {
        Endpoint::new(format!(
            "{}/{}/market_chart?vs_currency={}&days={}&interval={}",
            self.base_url,
            urlencoding::encode(state.symbol()),
            urlencoding::encode(state.market()),
            urlencoding::encode(state.days()),
            urlencoding::encode(state.interval()),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::FilterField;

    #[test]
    fn test_default_filters_build_expected_url() {
        let url = EndpointBuilder::default().build(&FilterState::default());
        assert_eq!(
            url.as_str(),
            "https://api.coingecko.com/api/v3/coins/bitcoin/market_chart?vs_currency=usd&days=1&interval=hourly"
        );
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        let builder = EndpointBuilder::new("http://localhost:8080/coins/");
        let url = builder.build(&FilterState::new("ethereum", "eur", "14", "daily"));
        assert_eq!(
            url.as_str(),
            "http://localhost:8080/coins/ethereum/market_chart?vs_currency=eur&days=14&interval=daily"
        );
    }

    #[test]
    fn test_build_is_deterministic() {
        let builder = EndpointBuilder::default();
        let a = FilterState::new("solana", "jpy", "30", "daily");
        let b = a.clone();
        assert_eq!(builder.build(&a), builder.build(&b));
        assert_eq!(builder.build(&a), builder.build(&a));
    }

    #[test]
    fn test_any_single_field_change_changes_url() {
        let builder = EndpointBuilder::default();
        let base = FilterState::default();
        let base_url = builder.build(&base);
        for field in FilterField::ALL {
            let mut changed = base.clone();
            changed.apply_filter_change(field, "max");
            assert_ne!(builder.build(&changed), base_url, "field {field} not reflected");
        }
    }

    #[test]
    fn test_values_are_encoded() {
        let builder = EndpointBuilder::new("http://h");
        // Without encoding these two would produce the same query string.
        let a = FilterState::new("x", "usd&days=2", "1", "hourly");
        let b = FilterState::new("x", "usd", "2&days=1", "hourly");
        assert_ne!(builder.build(&a), builder.build(&b));
        assert!(builder.build(&a).as_str().contains("vs_currency=usd%26days%3D2"));
    }
}
