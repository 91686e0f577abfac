use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("Failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse '{path}': {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Precomputed equity for strategy '{strategy}' on '{instrument}' is malformed: {source}")]
    InvalidEquity {
        strategy: String,
        instrument: String,
        #[source]
        source: core_types::CoreError,
    },
}
