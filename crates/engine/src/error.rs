use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Dataset error: {0}")]
    Dataset(#[from] dataset::DatasetError),

    #[error("Strategy '{0}' not found in the catalog.")]
    StrategyNotFound(String),
}
