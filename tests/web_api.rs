mod common;

use std::sync::Arc;

use reqwest::StatusCode;
use serde_json::Value;
use tempfile::TempDir;
use wiremock::{MockServer, ResponseTemplate};

use iss_tracker::predict::Observer;
use iss_tracker::tle::FileCache;
use iss_tracker::tracker::TrackerSettings;
use iss_tracker::web::{router, AppState};
use iss_tracker::Tracker;

use common::{catalog_body, mock_catalog, store_for, ISS_LINE1};

// Shortly after the fixture epoch.
const START: &str = "2020-07-12T21:30:00Z";

struct App {
    base: String,
    _catalog: MockServer,
    _dir: TempDir,
}

async fn spawn_app(catalog: MockServer, default_observer: Option<Observer>) -> App {
    let dir = TempDir::new().unwrap();
    let store = store_for(&catalog, FileCache::new(dir.path().join("tle_cache.json")));
    let state = AppState {
        tracker: Arc::new(Tracker::new(store, TrackerSettings::default())),
        default_observer,
    };

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router(state)).await.unwrap();
    });

    App {
        base: format!("http://{}", addr),
        _catalog: catalog,
        _dir: dir,
    }
}

async fn healthy_catalog() -> MockServer {
    mock_catalog(ResponseTemplate::new(200).set_body_string(catalog_body()), 1).await
}

async fn get(app: &App, path: &str) -> (StatusCode, Value) {
    let response = reqwest::get(format!("{}{}", app.base, path)).await.unwrap();
    let status = response.status();
    let body = response.text().await.unwrap();
    (status, serde_json::from_str(&body).unwrap_or(Value::Null))
}

#[tokio::test]
async fn serves_current_elements() {
    let app = spawn_app(healthy_catalog().await, None).await;

    let (status, body) = get(&app, "/api/tle").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["line1"], ISS_LINE1);
    assert_eq!(body["from_cache"], false);
    assert_eq!(body["stale"], false);

    let (_, again) = get(&app, "/api/tle").await;
    assert_eq!(again["from_cache"], true);
}

#[tokio::test]
async fn passes_for_query_observer() {
    let app = spawn_app(healthy_catalog().await, None).await;

    let (status, body) = get(&app, &format!("/api/passes?lat=41&lon=29&start={}", START)).await;
    assert_eq!(status, StatusCode::OK);
    let passes = body["passes"].as_array().unwrap();
    assert!(!passes.is_empty());
    assert_eq!(body["next_pass"], passes[0]);
    for pass in passes {
        assert!(pass["aos"].is_string());
        assert!(pass["max_elevation_deg"].as_f64().unwrap() >= 0.0);
    }
}

#[tokio::test]
async fn passes_fall_back_to_default_observer() {
    let observer = Observer::new(41.0, 29.0, 0.0).unwrap();
    let app = spawn_app(healthy_catalog().await, Some(observer)).await;

    let (status, body) = get(&app, &format!("/api/passes?start={}", START)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["passes"].is_array());
}

#[tokio::test]
async fn rejects_invalid_observer() {
    let catalog = mock_catalog(ResponseTemplate::new(200).set_body_string(catalog_body()), 0).await;
    let app = spawn_app(catalog, None).await;

    let (status, body) = get(&app, "/api/passes?lat=95&lon=29").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_failed");

    let (status, _) = get(&app, "/api/passes?lat=41").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = get(&app, "/api/passes").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn rejects_invalid_trajectory_window() {
    let catalog = mock_catalog(ResponseTemplate::new(200).set_body_string(catalog_body()), 0).await;
    let app = spawn_app(catalog, None).await;

    let (status, _) = get(&app, "/api/trajectory?step_seconds=0").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = get(&app, "/api/trajectory/geojson?past_minutes=-5").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn catalog_outage_without_cache_is_503() {
    let app = spawn_app(mock_catalog(ResponseTemplate::new(500), 1).await, None).await;

    let (status, body) = get(&app, "/api/tle").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"], "tle_unavailable");
}

#[tokio::test]
async fn catalog_garbage_is_502() {
    let catalog = mock_catalog(
        ResponseTemplate::new(200).set_body_string("No GP data found"),
        1,
    )
    .await;
    let app = spawn_app(catalog, None).await;

    let (status, body) = get(&app, "/api/tle/refresh").await;
    // Refresh is POST only.
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body, Value::Null);

    let response = reqwest::Client::new()
        .post(format!("{}/api/tle/refresh", app.base))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn publishes_openapi_document() {
    let catalog = mock_catalog(ResponseTemplate::new(200).set_body_string(catalog_body()), 0).await;
    let app = spawn_app(catalog, None).await;

    let (status, body) = get(&app, "/api-doc/openapi.json").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/api/passes"].is_object());
    assert!(body["paths"]["/api/tle/refresh"]["post"].is_object());
}
