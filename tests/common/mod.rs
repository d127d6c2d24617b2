#![allow(dead_code)]

use std::time::Duration;

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use iss_tracker::tle::{FileCache, HttpTleSource, OrbitalElementStore};

pub const ISS_LINE1: &str =
    "1 25544U 98067A   20194.88612269 -.00002218  00000-0 -31515-4 0  9992";
pub const ISS_LINE2: &str =
    "2 25544  51.6461 221.2784 0001413  89.1723 280.4612 15.49507896236008";

/// Catalog response as CelesTrak sends it: name line plus the two element lines.
pub fn catalog_body() -> String {
    format!("ISS (ZARYA)\r\n{}\r\n{}\r\n", ISS_LINE1, ISS_LINE2)
}

pub async fn mock_catalog(response: ResponseTemplate, expected_calls: u64) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/gp.php"))
        .respond_with(response)
        .expect(expected_calls)
        .mount(&server)
        .await;
    server
}

pub fn source_for(server: &MockServer) -> HttpTleSource {
    HttpTleSource::new(
        format!("{}/gp.php?CATNR=25544&FORMAT=TLE", server.uri()),
        Duration::from_secs(5),
    )
    .unwrap()
}

pub fn store_for(server: &MockServer, cache: FileCache) -> OrbitalElementStore {
    OrbitalElementStore::new(source_for(server), cache)
}
