use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::features::reviews::handlers;
use crate::features::reviews::services::ReviewService;
use crate::shared::constants::{MAX_IMAGES_PER_REVIEW, MAX_IMAGE_SIZE};

/// Ten photos at the size limit plus room for the text fields
const SAVE_REVIEW_BODY_LIMIT: usize = MAX_IMAGES_PER_REVIEW * MAX_IMAGE_SIZE + 1024 * 1024;

/// Create routes for the reviews feature
pub fn routes(service: Arc<ReviewService>) -> Router {
    Router::new()
        .route(
            "/save-review",
            post(handlers::save_review).layer(DefaultBodyLimit::max(SAVE_REVIEW_BODY_LIMIT)),
        )
        .route("/user/review-history", get(handlers::get_review_history))
        .with_state(service)
}
