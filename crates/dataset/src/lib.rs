//! # Quant Arena Dataset Crate
//!
//! This crate loads the three JSON documents the arena is built from: the
//! strategy catalog, the performance dataset and the changelog.
//!
//! ## Architectural Principles
//!
//! - **Adapter:** All file-system and JSON details live here. The rest of the
//!   workspace only sees typed documents from `core-types`.
//! - **Fail at load time:** Malformed equity arrays are rejected when the
//!   dataset is read, so the analytics path never sees them.
//!
//! ## Public API
//!
//! - `DataRepository`: the loaded documents plus catalog queries (search, tags,
//!   default instrument, changelog).
//! - `load_catalog` / `load_performance` / `load_changelog`: the individual loaders.
//! - `DatasetError`: the specific error types that can be returned from this crate.

pub mod error;
pub mod loader;
pub mod repository;

pub use error::DatasetError;
pub use loader::{load_catalog, load_changelog, load_performance, read_json};
pub use repository::{DataRepository, FALLBACK_INSTRUMENT};
