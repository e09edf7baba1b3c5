use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::features::places::models::PlaceState;

/// Verdict a reviewer gives on whether a finished issue was actually fixed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ReviewStatus {
    Pass,
    Fail,
}

impl ReviewStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReviewStatus::Pass => "pass",
            ReviewStatus::Fail => "fail",
        }
    }
}

impl std::fmt::Display for ReviewStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReviewStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pass" => Ok(ReviewStatus::Pass),
            "fail" => Ok(ReviewStatus::Fail),
            other => Err(format!("Invalid reviewStatus '{}', expected pass or fail", other)),
        }
    }
}

/// Everything needed to persist one review
#[derive(Debug, Clone)]
pub struct CreateReview {
    pub place_id: i64,
    pub user_id: String,
    pub display_name: String,
    pub review_status: ReviewStatus,
    pub stars: i32,
    pub comment: Option<String>,
    /// Public URLs of the stored photos
    pub images: Vec<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub distance: f64,
    pub created_at: DateTime<Utc>,
}

/// One of the caller's past reviews joined with its place
#[derive(Debug, Clone)]
pub struct ReviewHistoryEntry {
    pub review_id: i64,
    pub place_id: i64,
    pub ticket_id: Option<String>,
    pub place_type: Option<String>,
    pub organization: Option<String>,
    pub place_comment: Option<String>,
    pub address: Option<String>,
    pub district: Option<String>,
    pub province: Option<String>,
    pub place_state: Option<PlaceState>,
    pub photo: Option<String>,
    pub review_status: Option<ReviewStatus>,
    pub stars: i32,
    pub comment: Option<String>,
    pub images: Vec<String>,
    pub distance: f64,
    pub created_at: DateTime<Utc>,
}

/// Aggregate verdict counts for a place
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReviewStats {
    pub total: i64,
    pub pass_count: i64,
    pub fail_count: i64,
    /// `None` when the place has no reviews
    pub average_stars: Option<f64>,
}

/// A non-empty review comment with its author
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewComment {
    pub text: String,
    /// Display name the reviewer submitted with the review
    pub author: String,
    pub created_at: DateTime<Utc>,
}

/// Everything the place views show about a place's reviews
#[derive(Debug, Clone, Default)]
pub struct PlaceReviews {
    pub investigators: Vec<String>,
    pub stats: ReviewStats,
    pub agree_comments: Vec<ReviewComment>,
    pub disagree_comments: Vec<ReviewComment>,
}

/// Decode the stored photo list.
///
/// The column holds a JSON array of URLs; a legacy plain-text value is kept
/// as a single entry and a missing value yields no photos.
pub fn decode_image_list(raw: Option<&str>) -> Vec<String> {
    let Some(raw) = raw.map(str::trim).filter(|r| !r.is_empty()) else {
        return Vec::new();
    };

    match serde_json::from_str::<Vec<String>>(raw) {
        Ok(images) => images,
        Err(_) => vec![raw.to_string()],
    }
}

pub fn encode_image_list(images: &[String]) -> String {
    serde_json::to_string(images).unwrap_or_else(|_| "[]".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_review_status_parsing() {
        assert_eq!("pass".parse::<ReviewStatus>(), Ok(ReviewStatus::Pass));
        assert_eq!(" FAIL".parse::<ReviewStatus>(), Ok(ReviewStatus::Fail));
        assert!("maybe".parse::<ReviewStatus>().is_err());
    }

    #[test]
    fn test_decode_image_list() {
        assert_eq!(decode_image_list(None), Vec::<String>::new());
        assert_eq!(decode_image_list(Some("")), Vec::<String>::new());
        assert_eq!(
            decode_image_list(Some(r#"["http://a/1.jpg","http://a/2.jpg"]"#)),
            vec!["http://a/1.jpg".to_string(), "http://a/2.jpg".to_string()]
        );
        assert_eq!(
            decode_image_list(Some("http://a/legacy.jpg")),
            vec!["http://a/legacy.jpg".to_string()]
        );
    }

    #[test]
    fn test_encode_image_list() {
        let images = vec!["http://a/1.jpg".to_string()];
        assert_eq!(encode_image_list(&images), r#"["http://a/1.jpg"]"#);
        assert_eq!(decode_image_list(Some(&encode_image_list(&images))), images);
    }
}
