use thiserror::Error;

#[derive(Debug, Error)]
pub enum PredictError {
    #[error("Invalid observer: {0}")]
    InvalidObserver(String),
    #[error("Invalid TLE: {0}")]
    InvalidTle(#[from] sgp4::TleError),
    #[error("Elements error: {0}")]
    Elements(#[from] sgp4::ElementsError),
}
