//! # Quant Arena Engine
//!
//! The facade the binary talks to. It owns the loaded documents, the
//! configuration and the series cache, and wires the generator, analytics,
//! portfolio and analyzer crates together.
//!
//! ## Public API
//!
//! - `ArenaEngine`: every arena operation (series, metrics, leaderboards,
//!   rolling statistics, correlation, portfolios, catalog queries).
//! - `SeriesCache` / `SeriesKey`: the per-engine memo of full-length series.
//! - `NormalizedCurve`: a rebased strategy path for overlays.
//! - `EngineError`: the specific error types that can be returned from this crate.

pub mod arena;
pub mod cache;
pub mod curves;
pub mod error;

pub use arena::ArenaEngine;
pub use cache::{SeriesCache, SeriesKey};
pub use curves::{normalize_values, NormalizedCurve};
pub use error::EngineError;
