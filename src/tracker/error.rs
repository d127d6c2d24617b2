use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::predict::PredictError;
use crate::tle::TleError;

#[derive(Debug, Error)]
pub enum TrackerError {
    #[error(transparent)]
    Tle(#[from] TleError),
    #[error(transparent)]
    Predict(#[from] PredictError),
    #[error("scan task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
    #[error("pass scan aborted")]
    Aborted,
    #[error("no position available at {0}")]
    NoPosition(DateTime<Utc>),
}
