use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::line_auth::handlers;
use crate::features::line_auth::services::LineAuthService;

/// Create routes for LINE Login
pub fn routes(service: Arc<LineAuthService>) -> Router {
    Router::new()
        .route("/line/callback", get(handlers::line_callback))
        .with_state(service)
}
