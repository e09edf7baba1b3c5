use std::sync::Arc;

use axum::{extract::State, Json};

use crate::core::error::Result;
use crate::core::extractor::AppQuery;
use crate::features::places::dtos::{NearbyPlacesQuery, PlaceResponseDto, SearchPlacesQuery};
use crate::features::places::models::PlaceFilter;
use crate::features::places::services::PlaceService;
use crate::shared::geo::{parse_radius, Coordinates};
use crate::shared::types::{ApiResponse, Meta};

/// Places near a coordinate
///
/// Returns every stored issue strictly inside the radius, nearest first, each
/// with its review summary, investigators and comment threads.
#[utoipa::path(
    get,
    path = "/places/nearby-by-coordinates",
    params(NearbyPlacesQuery),
    responses(
        (status = 200, description = "Places ordered by distance", body = ApiResponse<Vec<PlaceResponseDto>>),
        (status = 400, description = "Invalid coordinates"),
        (status = 500, description = "Database error")
    ),
    tag = "places"
)]
pub async fn get_nearby_places(
    State(service): State<Arc<PlaceService>>,
    AppQuery(query): AppQuery<NearbyPlacesQuery>,
) -> Result<Json<ApiResponse<Vec<PlaceResponseDto>>>> {
    let center = Coordinates::from_params(query.lat.as_deref(), query.lng.as_deref())?;
    let radius = parse_radius(query.radius.as_deref(), service.default_radius());

    let places: Vec<PlaceResponseDto> = service
        .find_nearby(center, radius)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();

    let meta = Meta::for_len(places.len());
    Ok(Json(ApiResponse::success(Some(places), None, Some(meta))))
}

/// Search places
///
/// Filters by text, category, investigation state and finish date, then
/// applies the same radius and ordering as the nearby search. Without
/// `notInvestigated=true` only finished issues are returned.
#[utoipa::path(
    get,
    path = "/places/search",
    params(SearchPlacesQuery),
    responses(
        (status = 200, description = "Matching places ordered by distance", body = ApiResponse<Vec<PlaceResponseDto>>),
        (status = 400, description = "Invalid coordinates or filter value"),
        (status = 500, description = "Database error")
    ),
    tag = "places"
)]
pub async fn search_places(
    State(service): State<Arc<PlaceService>>,
    AppQuery(query): AppQuery<SearchPlacesQuery>,
) -> Result<Json<ApiResponse<Vec<PlaceResponseDto>>>> {
    let center = Coordinates::from_params(query.lat.as_deref(), query.lng.as_deref())?;
    let filter = PlaceFilter::from_search_params(
        query.search_term.as_deref(),
        query.case_type.as_deref(),
        query.not_investigated.as_deref(),
        query.finished_date.as_deref(),
    )?;
    let radius = parse_radius(query.radius.as_deref(), service.default_radius());

    let places: Vec<PlaceResponseDto> = service
        .search(&filter, center, radius)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();

    let meta = Meta::for_len(places.len());
    Ok(Json(ApiResponse::success(Some(places), None, Some(meta))))
}
