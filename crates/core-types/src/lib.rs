//! # Quant Arena Core Types
//!
//! The Layer 0 vocabulary shared by every other crate: price series, metrics
//! records, window tokens and the documents the engine consumes.

pub mod documents;
pub mod enums;
pub mod error;
pub mod metrics;
pub mod series;

// Re-export the core types to provide a clean public API.
pub use documents::{
    Changelog, ChangelogEntry, EquityEntry, Instrument, PerformanceDataset, StrategyCatalog,
    StrategyDescriptor, StrategyPerformance,
};
pub use enums::Window;
pub use error::CoreError;
pub use metrics::MetricsRecord;
pub use series::PriceSeries;
