mod cache;
mod error;
mod parsing;
mod source;
mod store;
mod types;

pub use cache::{FileCache, MemoryCache, TleCache};
pub use error::TleError;
pub use parsing::parse_tle_lines;
pub use source::{HttpTleSource, TleSource, DEFAULT_TIMEOUT, DEFAULT_URL_TEMPLATE, ISS_NORAD_ID};
pub use store::{OrbitalElementStore, DEFAULT_MAX_AGE};
pub use types::{OrbitalElements, TleRecord};
