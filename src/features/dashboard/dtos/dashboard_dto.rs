use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Points summary for a user
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserDashboardDto {
    pub user_id: String,
    /// Cumulative points from every accepted review
    pub points: i64,
}
