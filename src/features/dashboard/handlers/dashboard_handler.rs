use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};

use crate::core::error::Result;
use crate::features::dashboard::dtos::UserDashboardDto;
use crate::features::dashboard::services::DashboardService;
use crate::shared::types::ApiResponse;

/// Points of a user
#[utoipa::path(
    get,
    path = "/dashboard/{user_id}",
    params(
        ("user_id" = String, Path, description = "User identifier")
    ),
    responses(
        (status = 200, description = "Current point total", body = ApiResponse<UserDashboardDto>),
        (status = 500, description = "Database error")
    ),
    tag = "dashboard"
)]
pub async fn get_user_dashboard(
    State(service): State<Arc<DashboardService>>,
    Path(user_id): Path<String>,
) -> Result<Json<ApiResponse<UserDashboardDto>>> {
    let dashboard = service.get_user_dashboard(&user_id).await?;
    Ok(Json(ApiResponse::success(Some(dashboard), None, None)))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum_test::TestServer;
    use serde_json::Value;

    use crate::shared::test_helpers::{dashboard_router, InMemoryStore};

    #[tokio::test]
    async fn test_user_without_ledger_row_has_zero_points() {
        let store = Arc::new(InMemoryStore::default());
        let server = TestServer::new(dashboard_router(store)).unwrap();

        let response = server.get("/dashboard/U-new").await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["data"]["user_id"], "U-new");
        assert_eq!(body["data"]["points"], 0);
    }

    #[tokio::test]
    async fn test_user_points() {
        let store = Arc::new(InMemoryStore::default());
        store.set_points("U1", 42);
        let server = TestServer::new(dashboard_router(store)).unwrap();

        let body: Value = server.get("/dashboard/U1").await.json();
        assert_eq!(body["data"]["points"], 42);
    }
}
