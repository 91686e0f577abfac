use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Series arrays differ in length: {dates} dates, {strategy} strategy values, {benchmark} benchmark values")]
    LengthMismatch {
        dates: usize,
        strategy: usize,
        benchmark: usize,
    },
}
