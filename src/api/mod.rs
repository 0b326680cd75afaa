mod handlers;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::engine::Engine;

/// Shared handler state: the one process-wide platform session, injected so
/// tests can substitute a stub collaborator.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<dyn Engine>,
}

impl AppState {
    pub fn new(engine: Arc<dyn Engine>) -> Self {
        Self { engine }
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Tiles
        .route("/tiles/ci_composite", post(handlers::ci_composite_tiles))
        .route("/tiles/ci_by_date", post(handlers::ci_by_date_tiles))
        .route("/tiles/ndvi", post(handlers::ndvi_tiles))
        // AOI statistics
        .route("/stats/ci_timeseries_aoi", post(handlers::ci_time_series))
        .route("/stats/ndvi_timeseries", post(handlers::ndvi_time_series))
        .route(
            "/stats/ci_histogram_by_date",
            post(handlers::ci_histogram_by_date),
        )
        // Exports
        .route("/export/ci_selected", post(handlers::export_ci_selected))
        // Health
        .route("/health", get(handlers::health))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
