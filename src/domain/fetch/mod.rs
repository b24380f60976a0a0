//! Fetch domain — request identity and the tri-state result.

pub mod state;

pub use state::{FetchCommand, FetchState};

use crate::domain::market_chart::PriceSeries;
use crate::error::FetchError;

/// Monotonically increasing token identifying one issued request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestId(u64);

impl RequestId {
    pub fn value(&self) -> u64 {
        self.0
    }

    pub(crate) fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Flat status tag of a [`FetchResult`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum FetchStatus {
    #[default]
    Idle,
    Loading,
    Success,
    Error,
}

/// Result of the most recently issued request.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum FetchResult {
    /// Nothing issued yet. Never re-entered.
    #[default]
    Idle,
    Loading,
    Success(PriceSeries),
    Error(FetchError),
}

impl FetchResult {
    pub fn status(&self) -> FetchStatus {
        match self {
            Self::Idle => FetchStatus::Idle,
            Self::Loading => FetchStatus::Loading,
            Self::Success(_) => FetchStatus::Success,
            Self::Error(_) => FetchStatus::Error,
        }
    }

    pub fn series(&self) -> Option<&PriceSeries> {
        match self {
            Self::Success(series) => Some(series),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&FetchError> {
        match self {
            Self::Error(e) => Some(e),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}
