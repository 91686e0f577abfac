//! # Quant Arena Analytics Engine
//!
//! This crate turns price series into comparable statistics. It acts as the
//! "unbiased judge" of the arena: every strategy is measured by the same code.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** This is a pure logic crate. It has no knowledge of where
//!   series come from. It depends only on `core-types` (Layer 0).
//! - **Degrade, don't fail:** Short or degenerate inputs produce zero or `None`
//!   sentinels, never NaN and never an error. The only error is a caller
//!   passing unequal-length inputs to `pearson`.
//!
//! ## Public API
//!
//! - `slice_series`: trailing calendar windows.
//! - `AnalyticsEngine`: the full `MetricsRecord` of a series.
//! - `arena_score`: the bounded composite ranking number.
//! - `rolling_metrics` / `RollingSeries`: trailing-window sharpe, volatility and beta.
//! - `correlation_matrix` / `pearson` / `CorrelationMatrix`: pairwise return correlation.

pub mod correlation;
pub mod engine;
pub mod error;
pub mod report;
pub mod rolling;
pub mod score;
pub mod stats;
pub mod window;

pub use correlation::{correlation_matrix, pearson};
pub use engine::AnalyticsEngine;
pub use error::AnalyticsError;
pub use report::{CorrelationMatrix, RollingSeries};
pub use rolling::rolling_metrics;
pub use score::arena_score;
pub use window::slice_series;
