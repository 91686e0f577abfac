use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum AnalyticsError {
    #[error("Return series differ in length: {left} vs {right}")]
    LengthMismatch { left: usize, right: usize },
}
