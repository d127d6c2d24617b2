use axum::{extract::State, Json};

use crate::predict::TrajectoryPoint;
use crate::tle::OrbitalElements;
use crate::web::api::error::{ApiResult, ErrorResponse};
use crate::web::server::AppState;

#[utoipa::path(
    get,
    path = "/api/tle",
    tag = "elements",
    responses(
        (status = 200, description = "Element set in use", body = OrbitalElements),
        (status = 503, description = "No orbital elements available", body = ErrorResponse)
    )
)]
pub async fn current_elements(State(state): State<AppState>) -> ApiResult<Json<OrbitalElements>> {
    Ok(Json(state.tracker.elements(false).await?))
}

#[utoipa::path(
    post,
    path = "/api/tle/refresh",
    tag = "elements",
    responses(
        (status = 200, description = "Element set after a forced refresh", body = OrbitalElements),
        (status = 502, description = "Catalog returned unusable data", body = ErrorResponse),
        (status = 503, description = "No orbital elements available", body = ErrorResponse)
    )
)]
pub async fn refresh_elements(State(state): State<AppState>) -> ApiResult<Json<OrbitalElements>> {
    Ok(Json(state.tracker.elements(true).await?))
}

#[utoipa::path(
    get,
    path = "/api/position",
    tag = "elements",
    responses(
        (status = 200, description = "Sub-satellite point now", body = TrajectoryPoint),
        (status = 503, description = "No orbital elements or no position", body = ErrorResponse)
    )
)]
pub async fn position(State(state): State<AppState>) -> ApiResult<Json<TrajectoryPoint>> {
    Ok(Json(state.tracker.current_position().await?))
}
