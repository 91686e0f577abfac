//! # Quant Arena Portfolio Blender
//!
//! Combines several strategy series under a weight vector into one synthetic
//! portfolio, and solves inverse-volatility (risk-parity) weights.
//!
//! Weights are owned by the caller for the length of a comparison session;
//! nothing here keeps state between calls.

pub mod blender;
pub mod weights;

pub use blender::{blend, PortfolioResult};
pub use weights::{normalize_weights, risk_parity_weights};
