use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::places::handlers;
use crate::features::places::services::PlaceService;

/// Create routes for the places feature
pub fn routes(service: Arc<PlaceService>) -> Router {
    Router::new()
        .route(
            "/places/nearby-by-coordinates",
            get(handlers::get_nearby_places),
        )
        .route("/places/search", get(handlers::search_places))
        .with_state(service)
}
