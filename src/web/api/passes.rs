use axum::{
    extract::{Query, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::predict::{Observer, PassBundle};
use crate::tracker::Overview;
use crate::web::api::error::{ApiError, ApiResult, ErrorResponse};
use crate::web::server::AppState;

#[derive(Debug, Deserialize, ToSchema)]
pub struct ObserverQuery {
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    #[serde(default)]
    pub alt_km: Option<f64>,
    /// Search start (RFC3339), defaults to now.
    #[serde(default)]
    pub start: Option<DateTime<Utc>>,
}

impl ObserverQuery {
    fn observer(&self, fallback: Option<Observer>) -> ApiResult<Observer> {
        match (self.lat, self.lon) {
            (Some(lat), Some(lon)) => Observer::new(lat, lon, self.alt_km.unwrap_or(0.0))
                .map_err(|e| ApiError::Validation(e.to_string())),
            (None, None) => fallback.ok_or_else(|| {
                ApiError::Validation("lat and lon are required (no default observer)".into())
            }),
            _ => Err(ApiError::Validation("lat and lon go together".into())),
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/passes",
    tag = "passes",
    params(
        ("lat" = Option<f64>, Query, description = "Observer latitude (degrees)"),
        ("lon" = Option<f64>, Query, description = "Observer longitude (degrees)"),
        ("alt_km" = Option<f64>, Query, description = "Observer height (km)"),
        ("start" = Option<String>, Query, description = "Search start (RFC3339)")
    ),
    responses(
        (status = 200, description = "Next pass, next visible pass and all passes", body = PassBundle),
        (status = 400, description = "Invalid observer", body = ErrorResponse),
        (status = 503, description = "No orbital elements available", body = ErrorResponse)
    )
)]
pub async fn pass_bundle(
    State(state): State<AppState>,
    Query(query): Query<ObserverQuery>,
) -> ApiResult<Json<PassBundle>> {
    let observer = query.observer(state.default_observer)?;
    let start = query.start.unwrap_or_else(Utc::now);
    let bundle = state
        .tracker
        .compute_pass_bundle_at(observer, start, None)
        .await?;
    Ok(Json(bundle))
}

#[utoipa::path(
    get,
    path = "/api/overview",
    tag = "passes",
    params(
        ("lat" = Option<f64>, Query, description = "Observer latitude (degrees)"),
        ("lon" = Option<f64>, Query, description = "Observer longitude (degrees)"),
        ("alt_km" = Option<f64>, Query, description = "Observer height (km)"),
        ("start" = Option<String>, Query, description = "Reference time (RFC3339)")
    ),
    responses(
        (status = 200, description = "Elements, passes and ground track in one call", body = Overview),
        (status = 400, description = "Invalid observer", body = ErrorResponse),
        (status = 503, description = "No orbital elements available", body = ErrorResponse)
    )
)]
pub async fn overview(
    State(state): State<AppState>,
    Query(query): Query<ObserverQuery>,
) -> ApiResult<Json<Overview>> {
    let observer = query.observer(state.default_observer)?;
    let now = query.start.unwrap_or_else(Utc::now);
    Ok(Json(state.tracker.overview_at(observer, now).await?))
}
