use std::sync::Arc;

use axum::{extract::State, Json};

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppQuery;
use crate::features::traffy::dtos::{NearbyFeaturesDto, TraffyFeedDto, TraffyNearbyQuery};
use crate::features::traffy::models::TraffyState;
use crate::features::traffy::services::TraffyService;
use crate::shared::geo::{parse_radius, Coordinates};
use crate::shared::types::{ApiResponse, Meta};

/// Newly reported issues from the public civic API
#[utoipa::path(
    get,
    path = "/traffy/start",
    responses(
        (status = 200, description = "Upstream GeoJSON for state 'start'", body = ApiResponse<TraffyFeedDto>),
        (status = 502, description = "Civic API unavailable")
    ),
    tag = "traffy"
)]
pub async fn get_start_reports(
    State(service): State<Arc<TraffyService>>,
) -> Result<Json<ApiResponse<TraffyFeedDto>>> {
    let data = service.list_by_state(TraffyState::Start).await?;
    Ok(Json(ApiResponse::success(Some(TraffyFeedDto(data)), None, None)))
}

/// Issues in progress from the public civic API
#[utoipa::path(
    get,
    path = "/traffy/inprogress",
    responses(
        (status = 200, description = "Upstream GeoJSON for state 'inprogress'", body = ApiResponse<TraffyFeedDto>),
        (status = 502, description = "Civic API unavailable")
    ),
    tag = "traffy"
)]
pub async fn get_inprogress_reports(
    State(service): State<Arc<TraffyService>>,
) -> Result<Json<ApiResponse<TraffyFeedDto>>> {
    let data = service.list_by_state(TraffyState::Inprogress).await?;
    Ok(Json(ApiResponse::success(Some(TraffyFeedDto(data)), None, None)))
}

/// Civic API reports near a coordinate
#[utoipa::path(
    get,
    path = "/traffy/nearby",
    params(TraffyNearbyQuery),
    responses(
        (status = 200, description = "Features strictly inside the radius", body = ApiResponse<NearbyFeaturesDto>),
        (status = 400, description = "Invalid coordinates or state"),
        (status = 502, description = "Civic API unavailable")
    ),
    tag = "traffy"
)]
pub async fn get_nearby_reports(
    State(service): State<Arc<TraffyService>>,
    AppQuery(query): AppQuery<TraffyNearbyQuery>,
) -> Result<Json<ApiResponse<NearbyFeaturesDto>>> {
    let center = Coordinates::from_params(query.lat.as_deref(), query.lng.as_deref())?;
    let state = query
        .state
        .as_deref()
        .unwrap_or_default()
        .parse::<TraffyState>()
        .map_err(AppError::Validation)?;
    let radius = parse_radius(query.radius.as_deref(), service.default_radius());

    let features = service.nearby(center, radius, state).await?;
    let meta = Meta::for_len(features.len());

    Ok(Json(ApiResponse::success(
        Some(NearbyFeaturesDto { features }),
        None,
        Some(meta),
    )))
}
