use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::features::places::models::PlaceState;
use crate::features::reviews::models::{
    PointsBreakdown, ReviewComment, ReviewHistoryEntry, ReviewStats, ReviewStatus,
};
use crate::modules::images::UploadedImage;

/// Raw review submission as read from the multipart body, before validation
#[derive(Debug, Clone, Default)]
pub struct SaveReviewForm {
    pub place_id: Option<String>,
    pub user_id: Option<String>,
    pub display_name: Option<String>,
    pub review_status: Option<String>,
    pub stars: Option<String>,
    pub comment: Option<String>,
    pub lat: Option<String>,
    pub lng: Option<String>,
    pub timestamp: Option<String>,
    pub images: Vec<UploadedImage>,
}

/// Review submission form for OpenAPI documentation.
/// The handler reads the multipart body field by field.
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
#[schema(rename_all = "camelCase")]
pub struct SaveReviewFormDoc {
    #[schema(example = "1024")]
    pub place_id: String,
    #[schema(example = "U4af4980629")]
    pub user_id: String,
    #[schema(example = "Somchai")]
    pub display_name: String,
    /// "pass" when the issue is fixed, "fail" otherwise
    #[schema(example = "pass")]
    pub review_status: String,
    /// 0 to 5, defaults to 0
    pub stars: Option<i32>,
    /// Up to 2000 characters
    pub comment: Option<String>,
    #[schema(example = "13.7563")]
    pub lat: String,
    #[schema(example = "100.5018")]
    pub lng: String,
    /// RFC 3339 review time, defaults to now
    pub timestamp: Option<String>,
    /// Up to 10 JPEG/PNG photos, 20MB each
    #[schema(format = Binary, content_media_type = "application/octet-stream")]
    pub images: Option<Vec<String>>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SaveReviewResponseDto {
    pub review_id: i64,
    pub points_earned: PointsEarnedDto,
    /// Meters between reviewer and place, two decimals
    pub distance: f64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PointsEarnedDto {
    pub base: i64,
    pub distance: i64,
    pub comment: i64,
    pub image: i64,
    pub total: i64,
}

impl From<PointsBreakdown> for PointsEarnedDto {
    fn from(points: PointsBreakdown) -> Self {
        Self {
            base: points.base,
            distance: points.distance,
            comment: points.comment,
            image: points.image,
            total: points.total,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ReviewSummaryDto {
    pub total_reviews: i64,
    pub pass_count: i64,
    pub fail_count: i64,
    /// `null` when the place has no reviews
    pub average_stars: Option<f64>,
}

impl From<ReviewStats> for ReviewSummaryDto {
    fn from(stats: ReviewStats) -> Self {
        Self {
            total_reviews: stats.total,
            pass_count: stats.pass_count,
            fail_count: stats.fail_count,
            average_stars: stats.average_stars,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ReviewCommentDto {
    pub text: String,
    pub author: String,
    pub timestamp: DateTime<Utc>,
}

impl From<ReviewComment> for ReviewCommentDto {
    fn from(comment: ReviewComment) -> Self {
        Self {
            text: comment.text,
            author: comment.author,
            timestamp: comment.created_at,
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ReviewHistoryQuery {
    #[serde(rename = "userId")]
    pub user_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ReviewHistoryDto {
    pub review_id: i64,
    pub place_id: i64,
    pub ticket_id: Option<String>,
    #[serde(rename = "type")]
    pub place_type: Option<String>,
    pub organization: Option<String>,
    pub place_comment: Option<String>,
    pub address: Option<String>,
    pub district: Option<String>,
    pub province: Option<String>,
    pub state: Option<PlaceState>,
    pub photo: Option<String>,
    pub review_status: Option<ReviewStatus>,
    pub stars: i32,
    pub comment: Option<String>,
    pub images: Vec<String>,
    pub distance: f64,
    pub created_at: DateTime<Utc>,
}

impl From<ReviewHistoryEntry> for ReviewHistoryDto {
    fn from(entry: ReviewHistoryEntry) -> Self {
        Self {
            review_id: entry.review_id,
            place_id: entry.place_id,
            ticket_id: entry.ticket_id,
            place_type: entry.place_type,
            organization: entry.organization,
            place_comment: entry.place_comment,
            address: entry.address,
            district: entry.district,
            province: entry.province,
            state: entry.place_state,
            photo: entry.photo,
            review_status: entry.review_status,
            stars: entry.stars,
            comment: entry.comment,
            images: entry.images,
            distance: entry.distance,
            created_at: entry.created_at,
        }
    }
}
