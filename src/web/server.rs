use axum::{routing::get, routing::post, Router};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::predict::Observer;
use crate::tracker::Tracker;

use super::api::elements as element_handlers;
use super::api::passes as pass_handlers;
use super::api::trajectory as trajectory_handlers;
use super::api_doc::ApiDoc;

#[derive(Clone)]
pub struct AppState {
    pub tracker: Arc<Tracker>,
    /// Used by pass endpoints when the query carries no coordinates.
    pub default_observer: Option<Observer>,
}

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Element endpoints
        .route("/api/tle", get(element_handlers::current_elements))
        .route("/api/tle/refresh", post(element_handlers::refresh_elements))
        .route("/api/position", get(element_handlers::position))
        // Pass endpoints
        .route("/api/passes", get(pass_handlers::pass_bundle))
        .route("/api/overview", get(pass_handlers::overview))
        // Ground track endpoints
        .route("/api/trajectory", get(trajectory_handlers::trajectory))
        .route("/api/trajectory/geojson", get(trajectory_handlers::geojson))
        .route("/api/trajectory/globe", get(trajectory_handlers::globe))
        // OpenAPI / Swagger
        .merge(SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", ApiDoc::openapi()))
        // Middleware
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run_server(
    bind_addr: &str,
    tracker: Tracker,
    default_observer: Option<Observer>,
) -> std::io::Result<()> {
    let state = AppState {
        tracker: Arc::new(tracker),
        default_observer,
    };
    let app = router(state);

    log::info!("Starting server on {}", bind_addr);

    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    axum::serve(listener, app).await
}
