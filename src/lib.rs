//! # coinchart
//!
//! A market-chart query controller: user-selected filters in, a polled price
//! series out.
//!
//! ## Architecture
//!
//! The crate is organized in layers:
//!
//! 1. **Core** — Filters, endpoint derivation, payload transform, fetch state machine
//! 2. **HTTP** — `MarketChartSource` transport seam + `ChartHttp` (reqwest)
//! 3. **Controller** — Pure `reduce(model, event)` plus a tokio runtime that
//!    polls, drops stale responses, and publishes view snapshots
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use coinchart::prelude::*;
//!
//! let mut controller = Controller::builder().build();
//! controller.mount().await?;
//!
//! controller.filter_changed(FilterField::Market, "eur")?;
//!
//! let mut updates = controller.subscribe();
//! updates.changed().await?;
//! let props = updates.borrow().chart_props();
//! ```

// ── Layer 1: Core ────────────────────────────────────────────────────────────

/// Shared newtypes used across all domains.
pub mod shared;

/// Domain modules (vertical slices): filters, market chart, fetch lifecycle.
pub mod domain;

/// Unified error types.
pub mod error;

/// Provider URL and timing constants.
pub mod network;

// ── Layer 2: HTTP ────────────────────────────────────────────────────────────

/// Transport seam and reqwest client.
pub mod http;

// ── Layer 3: Controller ──────────────────────────────────────────────────────

/// Composition root: reducer, view state, runtime.
pub mod controller;

// ── Prelude ──────────────────────────────────────────────────────────────────

pub mod prelude {
    // Shared newtypes
    pub use crate::shared::{Endpoint, FilterField};

    // Domain types
    pub use crate::domain::fetch::{FetchResult, FetchState, FetchStatus, RequestId};
    pub use crate::domain::filter::FilterState;
    pub use crate::domain::market_chart::{extract_series, EndpointBuilder, PriceSeries};

    // Errors
    pub use crate::error::{ControllerError, FetchError, HttpError, SdkError};

    // Network
    pub use crate::network::{DEFAULT_API_URL, DEFAULT_POLL_INTERVAL_MS};

    // Transport
    #[cfg(feature = "http")]
    pub use crate::http::ChartHttp;
    pub use crate::http::{MarketChartSource, SourceFuture};

    // Controller
    pub use crate::controller::{
        reduce, ChartProps, Command, Controller, ControllerBuilder, ControllerConfig, Event,
        Model, PlaceholderProps, Snapshot,
    };
}
