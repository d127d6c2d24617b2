use utoipa::OpenApi;

use super::api::error::ErrorResponse;
use super::api::trajectory::GlobePaths;

#[derive(OpenApi)]
#[openapi(
    paths(
        super::api::elements::current_elements,
        super::api::elements::refresh_elements,
        super::api::elements::position,
        super::api::passes::pass_bundle,
        super::api::passes::overview,
        super::api::trajectory::trajectory,
        super::api::trajectory::geojson,
        super::api::trajectory::globe,
    ),
    components(
        schemas(
            ErrorResponse,
            GlobePaths,
            crate::tle::OrbitalElements,
            crate::predict::Observer,
            crate::predict::Pass,
            crate::predict::PassBundle,
            crate::predict::Trajectory,
            crate::predict::TrajectoryPoint,
            crate::geo::Feature,
            crate::geo::FeatureCollection,
            crate::geo::Geometry,
            crate::geo::GlobePoint,
            crate::tracker::Overview,
        )
    ),
    info(
        title = "ISS Tracker API",
        description = "Orbital elements, pass predictions and ground tracks for the ISS",
        version = "0.1.0"
    ),
    tags(
        (name = "elements", description = "Orbital element set and current position"),
        (name = "passes", description = "Pass predictions for an observer"),
        (name = "trajectory", description = "Ground track around now")
    )
)]
pub struct ApiDoc;
