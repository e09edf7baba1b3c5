use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::features::places::models::PlaceState;
use crate::features::places::services::EnrichedPlace;
use crate::features::reviews::dtos::{ReviewCommentDto, ReviewSummaryDto};
use crate::shared::geo::{format_distance, Coordinates};

/// Query params for the nearby search
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct NearbyPlacesQuery {
    /// Latitude of the caller, -90 to 90
    pub lat: Option<String>,
    /// Longitude of the caller, -180 to 180
    pub lng: Option<String>,
    /// Search radius in meters, defaults to 25000
    pub radius: Option<String>,
}

/// Query params for the filtered search
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
#[serde(rename_all = "camelCase")]
pub struct SearchPlacesQuery {
    /// Substring of ticket id, description or organization
    pub search_term: Option<String>,
    /// Substring of the issue category
    pub case_type: Option<String>,
    /// `true` selects issues that are not finished yet; otherwise finished ones
    pub not_investigated: Option<String>,
    /// Finished on this date (YYYY-MM-DD)
    pub finished_date: Option<String>,
    pub lat: Option<String>,
    pub lng: Option<String>,
    /// Search radius in meters, defaults to 25000
    pub radius: Option<String>,
}

/// A place with its distance from the caller and its review data
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PlaceResponseDto {
    pub id: i64,
    pub ticket_id: Option<String>,
    #[serde(rename = "type")]
    pub place_type: Option<String>,
    pub organization: Option<String>,
    pub organization_action: Option<String>,
    pub comment: Option<String>,
    pub coordinates: Option<Coordinates>,
    pub photo: Option<String>,
    pub photo_after: Option<String>,
    pub address: Option<String>,
    pub subdistrict: Option<String>,
    pub district: Option<String>,
    pub province: Option<String>,
    pub timestamp: Option<DateTime<Utc>>,
    pub timestamp_inprogress: Option<DateTime<Utc>>,
    pub timestamp_finished: Option<DateTime<Utc>>,
    pub last_activity: Option<DateTime<Utc>>,
    pub state: Option<PlaceState>,
    pub star: Option<f64>,
    pub count_reopen: i32,
    pub duration_minutes_inprogress: Option<i32>,
    pub duration_minutes_finished: Option<i32>,
    pub duration_minutes_total: Option<i32>,
    pub view_count: i32,
    pub total_point: i32,
    pub likes: i32,
    pub dislikes: i32,
    /// Meters from the caller
    pub distance: f64,
    /// e.g. "2 km 350 m"
    pub distance_text: String,
    /// Display name of every reviewer, one entry per review
    pub investigators: Vec<String>,
    pub review_summary: ReviewSummaryDto,
    pub agree_comments: Vec<ReviewCommentDto>,
    pub disagree_comments: Vec<ReviewCommentDto>,
}

impl From<EnrichedPlace> for PlaceResponseDto {
    fn from(enriched: EnrichedPlace) -> Self {
        let EnrichedPlace { located, reviews } = enriched;
        let place = located.place;

        Self {
            id: place.id,
            ticket_id: place.ticket_id,
            place_type: place.place_type,
            organization: place.organization,
            organization_action: place.organization_action,
            comment: place.comment,
            coordinates: place.coordinates,
            photo: place.photo,
            photo_after: place.photo_after,
            address: place.address,
            subdistrict: place.subdistrict,
            district: place.district,
            province: place.province,
            timestamp: place.timestamp,
            timestamp_inprogress: place.timestamp_inprogress,
            timestamp_finished: place.timestamp_finished,
            last_activity: place.last_activity,
            state: place.state,
            star: place.star,
            count_reopen: place.count_reopen,
            duration_minutes_inprogress: place.duration_minutes_inprogress,
            duration_minutes_finished: place.duration_minutes_finished,
            duration_minutes_total: place.duration_minutes_total,
            view_count: place.view_count,
            total_point: place.total_point,
            likes: place.likes,
            dislikes: place.dislikes,
            distance: located.distance,
            distance_text: format_distance(located.distance),
            investigators: reviews.investigators,
            review_summary: reviews.stats.into(),
            agree_comments: reviews.agree_comments.into_iter().map(Into::into).collect(),
            disagree_comments: reviews.disagree_comments.into_iter().map(Into::into).collect(),
        }
    }
}
