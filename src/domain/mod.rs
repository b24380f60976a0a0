//! Domain modules organized as vertical slices.
//!
//! Each sub-module contains some of:
//! - `mod.rs` — Domain types
//! - `wire.rs` — Raw serde structs matching provider responses
//! - `convert.rs` — Conversions with validation
//! - `state.rs` — State containers with update methods

pub mod fetch;
pub mod filter;
pub mod market_chart;
