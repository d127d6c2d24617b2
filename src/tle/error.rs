use thiserror::Error;

#[derive(Debug, Error)]
pub enum TleError {
    #[error("No orbital elements available: {0}")]
    Unavailable(String),
    #[error("Invalid TLE: {0}")]
    Parse(String),
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("TLE source answered with HTTP {0}")]
    Status(u16),
    #[error("Cache IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Cache format error: {0}")]
    Json(#[from] serde_json::Error),
}
