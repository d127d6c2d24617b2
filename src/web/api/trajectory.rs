use axum::{
    extract::{Query, State},
    Json,
};
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::geo::{globe_paths, trajectory_to_geojson, FeatureCollection, GlobePoint};
use crate::predict::{Trajectory, TrajectoryOptions};
use crate::web::api::error::{ApiError, ApiResult, ErrorResponse};
use crate::web::server::AppState;

const MAX_WINDOW_MINUTES: i64 = 24 * 60;

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct TrajectoryQuery {
    pub past_minutes: Option<i64>,
    pub future_minutes: Option<i64>,
    pub step_seconds: Option<i64>,
}

impl TrajectoryQuery {
    fn options(&self, defaults: TrajectoryOptions) -> ApiResult<TrajectoryOptions> {
        for (name, minutes) in [
            ("past_minutes", self.past_minutes),
            ("future_minutes", self.future_minutes),
        ] {
            if let Some(m) = minutes {
                if !(0..=MAX_WINDOW_MINUTES).contains(&m) {
                    return Err(ApiError::Validation(format!(
                        "{} must be within 0..={}",
                        name, MAX_WINDOW_MINUTES
                    )));
                }
            }
        }
        if matches!(self.step_seconds, Some(s) if s <= 0) {
            return Err(ApiError::Validation("step_seconds must be positive".into()));
        }

        Ok(TrajectoryOptions {
            past: self.past_minutes.map(Duration::minutes).unwrap_or(defaults.past),
            future: self
                .future_minutes
                .map(Duration::minutes)
                .unwrap_or(defaults.future),
            step: self.step_seconds.map(Duration::seconds).unwrap_or(defaults.step),
        })
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct GlobePaths {
    pub past: Vec<Vec<GlobePoint>>,
    pub future: Vec<Vec<GlobePoint>>,
}

async fn sample(state: &AppState, query: &TrajectoryQuery) -> ApiResult<Trajectory> {
    let options = query.options(state.tracker.settings().trajectory)?;
    Ok(state.tracker.calculate_trajectory_at(Utc::now(), options).await?)
}

#[utoipa::path(
    get,
    path = "/api/trajectory",
    tag = "trajectory",
    params(
        ("past_minutes" = Option<i64>, Query, description = "Minutes of track behind now"),
        ("future_minutes" = Option<i64>, Query, description = "Minutes of track ahead of now"),
        ("step_seconds" = Option<i64>, Query, description = "Sample spacing")
    ),
    responses(
        (status = 200, description = "Past and future ground track", body = Trajectory),
        (status = 400, description = "Invalid window", body = ErrorResponse),
        (status = 503, description = "No orbital elements available", body = ErrorResponse)
    )
)]
pub async fn trajectory(
    State(state): State<AppState>,
    Query(query): Query<TrajectoryQuery>,
) -> ApiResult<Json<Trajectory>> {
    Ok(Json(sample(&state, &query).await?))
}

#[utoipa::path(
    get,
    path = "/api/trajectory/geojson",
    tag = "trajectory",
    params(
        ("past_minutes" = Option<i64>, Query, description = "Minutes of track behind now"),
        ("future_minutes" = Option<i64>, Query, description = "Minutes of track ahead of now"),
        ("step_seconds" = Option<i64>, Query, description = "Sample spacing")
    ),
    responses(
        (status = 200, description = "Past and future track as GeoJSON features", body = FeatureCollection),
        (status = 400, description = "Invalid window", body = ErrorResponse),
        (status = 503, description = "No orbital elements available", body = ErrorResponse)
    )
)]
pub async fn geojson(
    State(state): State<AppState>,
    Query(query): Query<TrajectoryQuery>,
) -> ApiResult<Json<FeatureCollection>> {
    let trajectory = sample(&state, &query).await?;
    Ok(Json(FeatureCollection::new(vec![
        trajectory_to_geojson(&trajectory.past).with_property("kind", "past"),
        trajectory_to_geojson(&trajectory.future).with_property("kind", "future"),
    ])))
}

#[utoipa::path(
    get,
    path = "/api/trajectory/globe",
    tag = "trajectory",
    params(
        ("past_minutes" = Option<i64>, Query, description = "Minutes of track behind now"),
        ("future_minutes" = Option<i64>, Query, description = "Minutes of track ahead of now"),
        ("step_seconds" = Option<i64>, Query, description = "Sample spacing")
    ),
    responses(
        (status = 200, description = "Past and future track as globe paths", body = GlobePaths),
        (status = 400, description = "Invalid window", body = ErrorResponse),
        (status = 503, description = "No orbital elements available", body = ErrorResponse)
    )
)]
pub async fn globe(
    State(state): State<AppState>,
    Query(query): Query<TrajectoryQuery>,
) -> ApiResult<Json<GlobePaths>> {
    let trajectory = sample(&state, &query).await?;
    Ok(Json(GlobePaths {
        past: globe_paths(&trajectory.past),
        future: globe_paths(&trajectory.future),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_overrides_defaults() {
        let query = TrajectoryQuery {
            past_minutes: Some(10),
            future_minutes: None,
            step_seconds: Some(60),
        };
        let options = query.options(TrajectoryOptions::default()).unwrap();
        assert_eq!(options, TrajectoryOptions::from_minutes(10, 90, 60));
    }

    #[test]
    fn query_rejects_bad_windows() {
        let too_long = TrajectoryQuery {
            future_minutes: Some(MAX_WINDOW_MINUTES + 1),
            ..TrajectoryQuery::default()
        };
        assert!(too_long.options(TrajectoryOptions::default()).is_err());

        let zero_step = TrajectoryQuery {
            step_seconds: Some(0),
            ..TrajectoryQuery::default()
        };
        assert!(zero_step.options(TrajectoryOptions::default()).is_err());
    }
}
