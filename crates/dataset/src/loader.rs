use crate::error::DatasetError;
use core_types::{Changelog, PerformanceDataset, StrategyCatalog};
use serde::de::DeserializeOwned;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// Reads and deserializes one JSON document.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, DatasetError> {
    let text = fs::read_to_string(path).map_err(|source| DatasetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| DatasetError::Json {
        path: path.to_path_buf(),
        source,
    })
}

pub fn load_catalog(path: &Path) -> Result<StrategyCatalog, DatasetError> {
    let catalog: StrategyCatalog = read_json(path)?;
    tracing::info!(
        path = %path.display(),
        strategies = catalog.strategies.len(),
        "Loaded strategy catalog."
    );
    Ok(catalog)
}

/// Loads the performance dataset and checks every precomputed equity entry.
pub fn load_performance(path: &Path) -> Result<PerformanceDataset, DatasetError> {
    let dataset: PerformanceDataset = read_json(path)?;

    for (strategy, perf) in &dataset.strategies {
        for (instrument, equity) in &perf.equity {
            equity
                .validate()
                .map_err(|source| DatasetError::InvalidEquity {
                    strategy: strategy.clone(),
                    instrument: instrument.clone(),
                    source,
                })?;
        }
    }

    let precomputed: usize = dataset.strategies.values().map(|p| p.equity.len()).sum();
    tracing::info!(
        path = %path.display(),
        strategies = dataset.strategies.len(),
        instruments = dataset.instruments.len(),
        precomputed,
        "Loaded performance dataset."
    );
    Ok(dataset)
}

/// Loads the changelog. A missing file yields an empty changelog.
pub fn load_changelog(path: &Path) -> Result<Changelog, DatasetError> {
    match fs::metadata(path) {
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::warn!(path = %path.display(), "Changelog not found, continuing without it.");
            Ok(Changelog::default())
        }
        _ => read_json(path),
    }
}
