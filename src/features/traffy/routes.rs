use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::traffy::handlers;
use crate::features::traffy::services::TraffyService;

/// Create routes for the civic API proxy
pub fn routes(service: Arc<TraffyService>) -> Router {
    Router::new()
        .route("/traffy/start", get(handlers::get_start_reports))
        .route("/traffy/inprogress", get(handlers::get_inprogress_reports))
        .route("/traffy/nearby", get(handlers::get_nearby_reports))
        .with_state(service)
}
