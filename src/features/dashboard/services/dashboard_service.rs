use std::sync::Arc;

use crate::core::error::{AppError, Result};
use crate::features::dashboard::dtos::UserDashboardDto;
use crate::features::reviews::repositories::ReviewRepository;

/// Per-user points dashboard
pub struct DashboardService {
    reviews: Arc<dyn ReviewRepository>,
}

impl DashboardService {
    pub fn new(reviews: Arc<dyn ReviewRepository>) -> Self {
        Self { reviews }
    }

    /// Current ledger total. A user who never earned points has 0.
    pub async fn get_user_dashboard(&self, user_id: &str) -> Result<UserDashboardDto> {
        let user_id = user_id.trim();
        if user_id.is_empty() {
            return Err(AppError::Validation("userId is required".to_string()));
        }

        let points = self.reviews.get_user_points(user_id).await?.unwrap_or(0);

        Ok(UserDashboardDto {
            user_id: user_id.to_string(),
            points,
        })
    }
}
