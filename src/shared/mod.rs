//! Shared newtypes used across all domain modules.
//!
//! These types are serialization-transparent: they serialize/deserialize as the
//! plain strings the filter UI and the provider use.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::str::FromStr;

use crate::error::SdkError;

// ─── FilterField ─────────────────────────────────────────────────────────────

/// One user-selectable filter axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterField {
    Symbol,
    Market,
    Days,
    Interval,
}

impl FilterField {
    pub const ALL: [FilterField; 4] = [
        FilterField::Symbol,
        FilterField::Market,
        FilterField::Days,
        FilterField::Interval,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Symbol => "symbol",
            Self::Market => "market",
            Self::Days => "days",
            Self::Interval => "interval",
        }
    }
}

impl std::fmt::Display for FilterField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for FilterField {
    type Err = SdkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "symbol" => Ok(Self::Symbol),
            "market" => Ok(Self::Market),
            "days" => Ok(Self::Days),
            "interval" => Ok(Self::Interval),
            other => Err(SdkError::Validation(format!(
                "unknown filter field: {other:?}"
            ))),
        }
    }
}

// ─── Endpoint ────────────────────────────────────────────────────────────────

/// Fully-formed request URL derived from a filter combination.
///
/// Also the request identity the fetch orchestrator deduplicates on.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Endpoint(String);

impl Endpoint {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Endpoint {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for Endpoint {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl Serialize for Endpoint {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Endpoint {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Endpoint(s))
    }
}
