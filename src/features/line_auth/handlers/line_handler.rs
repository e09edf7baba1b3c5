use std::sync::Arc;

use axum::{extract::State, Json};

use crate::core::error::Result;
use crate::core::extractor::AppQuery;
use crate::features::line_auth::dtos::{LineCallbackQuery, LineLoginDto};
use crate::features::line_auth::services::LineAuthService;
use crate::shared::types::ApiResponse;

/// LINE Login callback
///
/// Exchanges the authorization code and returns the LINE profile.
#[utoipa::path(
    get,
    path = "/line/callback",
    params(LineCallbackQuery),
    responses(
        (status = 200, description = "LINE Login successful", body = ApiResponse<LineLoginDto>),
        (status = 400, description = "Authorization code is missing"),
        (status = 502, description = "LINE rejected the code or is unavailable")
    ),
    tag = "auth"
)]
pub async fn line_callback(
    State(service): State<Arc<LineAuthService>>,
    AppQuery(query): AppQuery<LineCallbackQuery>,
) -> Result<Json<ApiResponse<LineLoginDto>>> {
    if let Some(state) = query.state.as_deref() {
        tracing::debug!("LINE callback state: {}", state);
    }

    let profile = service.complete_login(query.code.as_deref()).await?;

    Ok(Json(ApiResponse::success(
        Some(LineLoginDto { profile }),
        Some("LINE Login successful".to_string()),
        None,
    )))
}
