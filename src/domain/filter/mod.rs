//! Filter domain — the four user-selectable query axes.

use crate::shared::FilterField;
use serde::{Deserialize, Serialize};

pub const DEFAULT_SYMBOL: &str = "bitcoin";
pub const DEFAULT_MARKET: &str = "usd";
pub const DEFAULT_DAYS: &str = "1";
pub const DEFAULT_INTERVAL: &str = "hourly";

/// Current filter selection.
///
/// Values come from the option lists of the external filter UI and are not
/// validated here. Mutation goes through [`FilterState::apply_filter_change`] only.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FilterState {
    symbol: String,
    market: String,
    days: String,
    interval: String,
}

impl Default for FilterState {
    fn default() -> Self {
        Self::new(DEFAULT_SYMBOL, DEFAULT_MARKET, DEFAULT_DAYS, DEFAULT_INTERVAL)
    }
}

impl FilterState {
    pub fn new(
        symbol: impl Into<String>,
        market: impl Into<String>,
        days: impl Into<String>,
        interval: impl Into<String>,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            market: market.into(),
            days: days.into(),
            interval: interval.into(),
        }
    }

    /// Replace exactly one field. Returns `true` if the value changed.
    pub fn apply_filter_change(&mut self, field: FilterField, value: impl Into<String>) -> bool {
        let value = value.into();
        let slot = match field {
            FilterField::Symbol => &mut self.symbol,
            FilterField::Market => &mut self.market,
            FilterField::Days => &mut self.days,
            FilterField::Interval => &mut self.interval,
        };
        if *slot == value {
            return false;
        }
        *slot = value;
        true
    }

    pub fn get(&self, field: FilterField) -> &str {
        match field {
            FilterField::Symbol => &self.symbol,
            FilterField::Market => &self.market,
            FilterField::Days => &self.days,
            FilterField::Interval => &self.interval,
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn market(&self) -> &str {
        &self.market
    }

    pub fn days(&self) -> &str {
        &self.days
    }

    pub fn interval(&self) -> &str {
        &self.interval
    }
}
