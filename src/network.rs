//! Network constants for the market-chart provider.

/// Default REST API base URL (coins collection).
pub const DEFAULT_API_URL: &str = "https://api.coingecko.com/api/v3/coins";

/// Default polling period between unconditional refetches.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 100_000;

/// Default per-request timeout.
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 30_000;
