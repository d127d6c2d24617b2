use std::time::Duration;

use async_trait::async_trait;

use crate::tle::TleError;

pub const DEFAULT_URL_TEMPLATE: &str =
    "https://celestrak.org/NORAD/elements/gp.php?CATNR={norad_id}&FORMAT=TLE";
pub const ISS_NORAD_ID: u32 = 25544;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Where fresh element text comes from.
#[async_trait]
pub trait TleSource: Send + Sync {
    /// Raw catalog text: an optional name line followed by the two element lines.
    async fn fetch(&self) -> Result<String, TleError>;
}

pub struct HttpTleSource {
    client: reqwest::Client,
    url: String,
}

impl HttpTleSource {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, TleError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    /// `template` may contain `{norad_id}`.
    pub fn for_catalog_number(template: &str, norad_id: u32, timeout: Duration) -> Result<Self, TleError> {
        Self::new(template.replace("{norad_id}", &norad_id.to_string()), timeout)
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl TleSource for HttpTleSource {
    async fn fetch(&self) -> Result<String, TleError> {
        log::debug!("Fetching TLE from {}", self.url);
        let response = self.client.get(&self.url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(TleError::Status(status.as_u16()));
        }
        Ok(response.text().await?)
    }
}
