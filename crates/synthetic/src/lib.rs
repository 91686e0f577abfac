//! # Quant Arena Synthetic Series
//!
//! Deterministic daily price paths for (strategy, instrument) pairs that have
//! no precomputed equity.
//!
//! The PRNG is part of the contract: every downstream number depends on its
//! exact bit sequence, so it must never be swapped for a platform generator.
//!
//! ## Public API
//!
//! - `Mulberry32`: the seeded uniform generator.
//! - `standard_normal`: Box-Muller sampling on top of it.
//! - `instrument_offset`: the stable per-symbol seed offset.
//! - `generate_series` / `SeriesParams`: the path generator itself.

pub mod generator;
pub mod hash;
pub mod normal;
pub mod rng;

pub use generator::{generate_series, SeriesParams};
pub use hash::instrument_offset;
pub use normal::standard_normal;
pub use rng::Mulberry32;
