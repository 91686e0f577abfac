use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum AnalyzerError {
    #[error("Unknown ranking metric '{0}'")]
    UnknownMetric(String),

    #[error("Unknown sort direction '{0}', expected 'asc' or 'desc'")]
    UnknownDirection(String),
}
