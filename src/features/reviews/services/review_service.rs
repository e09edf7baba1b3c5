use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::future::join_all;
use futures::{stream, StreamExt, TryStreamExt};
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::features::places::repositories::PlaceRepository;
use crate::features::reviews::dtos::SaveReviewForm;
use crate::features::reviews::models::{
    CreateReview, PointsBreakdown, ReviewHistoryEntry, ReviewStatus,
};
use crate::features::reviews::repositories::ReviewRepository;
use crate::features::reviews::services::scoring::calculate_points;
use crate::modules::images::{ImageStore, ProcessedImage, StoredImage, UploadedImage};
use crate::shared::constants::{MAX_IMAGES_PER_REVIEW, MAX_IMAGE_SIZE};
use crate::shared::geo::{haversine_distance, Coordinates};
use crate::shared::validation::is_allowed_image;

/// Photos processed and uploaded at the same time for one submission
const IMAGE_UPLOAD_CONCURRENCY: usize = 4;

/// A submission that passed every input check
#[derive(Debug, Validate)]
struct ReviewSubmission {
    place_id: i64,
    user_id: String,
    display_name: String,
    review_status: ReviewStatus,
    #[validate(range(min = 0, max = 5, message = "stars must be between 0 and 5"))]
    stars: i32,
    #[validate(length(max = 2000, message = "comment must be at most 2000 characters"))]
    comment: Option<String>,
    location: Coordinates,
    created_at: DateTime<Utc>,
    images: Vec<UploadedImage>,
}

fn required(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
}

impl ReviewSubmission {
    /// Checks run in a fixed order and stop at the first failure: presence,
    /// coordinates, then field formats.
    fn from_form(form: SaveReviewForm) -> Result<Self> {
        let (Some(place_id), Some(user_id), Some(display_name), Some(_), Some(_)) = (
            required(&form.place_id),
            required(&form.user_id),
            required(&form.display_name),
            required(&form.lat),
            required(&form.lng),
        ) else {
            return Err(AppError::Validation("Missing required fields".to_string()));
        };

        let location = Coordinates::from_params(form.lat.as_deref(), form.lng.as_deref())?;

        let place_id = place_id
            .parse::<i64>()
            .map_err(|_| AppError::Validation("placeId must be a number".to_string()))?;

        let review_status = required(&form.review_status)
            .ok_or_else(|| AppError::Validation("reviewStatus must be pass or fail".to_string()))?
            .parse::<ReviewStatus>()
            .map_err(AppError::Validation)?;

        let stars = match required(&form.stars) {
            None => 0,
            Some(raw) => raw.parse::<i32>().map_err(|_| {
                AppError::Validation("stars must be an integer between 0 and 5".to_string())
            })?,
        };

        let created_at = match required(&form.timestamp) {
            None => Utc::now(),
            Some(raw) => DateTime::parse_from_rfc3339(&raw)
                .map(|t| t.with_timezone(&Utc))
                .map_err(|_| {
                    AppError::Validation("timestamp must be an RFC 3339 date-time".to_string())
                })?,
        };

        let submission = Self {
            place_id,
            user_id,
            display_name,
            review_status,
            stars,
            comment: required(&form.comment),
            location,
            created_at,
            images: form.images,
        };

        submission
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        if submission.images.len() > MAX_IMAGES_PER_REVIEW {
            return Err(AppError::Validation(format!(
                "At most {} images can be attached",
                MAX_IMAGES_PER_REVIEW
            )));
        }

        for image in &submission.images {
            if !is_allowed_image(&image.file_name, &image.content_type) {
                return Err(AppError::Validation(format!(
                    "'{}' is not a JPEG or PNG image",
                    image.file_name
                )));
            }
            if image.data.len() > MAX_IMAGE_SIZE {
                return Err(AppError::Validation(format!(
                    "'{}' exceeds the {}MB size limit",
                    image.file_name,
                    MAX_IMAGE_SIZE / (1024 * 1024)
                )));
            }
        }

        Ok(submission)
    }
}

/// Result of an accepted review
#[derive(Debug, Clone)]
pub struct ReviewReceipt {
    pub review_id: i64,
    pub points: PointsBreakdown,
    /// Meters between the reviewer and the place
    pub distance: f64,
}

/// Review submission and history
pub struct ReviewService {
    places: Arc<dyn PlaceRepository>,
    reviews: Arc<dyn ReviewRepository>,
    images: Arc<dyn ImageStore>,
}

impl ReviewService {
    pub fn new(
        places: Arc<dyn PlaceRepository>,
        reviews: Arc<dyn ReviewRepository>,
        images: Arc<dyn ImageStore>,
    ) -> Self {
        Self {
            places,
            reviews,
            images,
        }
    }

    /// Validate, score and persist a review, crediting the reviewer's ledger
    pub async fn submit(&self, form: SaveReviewForm) -> Result<ReviewReceipt> {
        let submission = ReviewSubmission::from_form(form)?;

        let place = self
            .places
            .find_by_id(submission.place_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Place not found".to_string()))?;
        let place_location = place
            .coordinates
            .ok_or_else(|| AppError::Validation("Invalid place".to_string()))?;

        let distance = haversine_distance(&submission.location, &place_location);
        let points = calculate_points(
            distance,
            submission.comment.as_deref(),
            submission.images.len(),
        );

        // Every photo must decode before anything is written to storage
        let processed: Vec<ProcessedImage> = stream::iter(submission.images)
            .map(|image| self.images.process(image))
            .buffered(IMAGE_UPLOAD_CONCURRENCY)
            .try_collect()
            .await?;
        let stored = self.store_images(&submission.user_id, processed).await?;

        let review = CreateReview {
            place_id: place.id,
            user_id: submission.user_id.clone(),
            display_name: submission.display_name,
            review_status: submission.review_status,
            stars: submission.stars,
            comment: submission.comment,
            images: stored.iter().map(|image| image.url.clone()).collect(),
            latitude: submission.location.lat,
            longitude: submission.location.lng,
            distance,
            created_at: submission.created_at,
        };

        let review_id = match self.reviews.create_with_points(&review, points.total).await {
            Ok(id) => id,
            Err(e) => {
                self.discard_images(&stored).await;
                return Err(e);
            }
        };

        tracing::info!(
            "Review {} on place {} by {}: {} points ({:.0} m away)",
            review_id,
            review.place_id,
            review.user_id,
            points.total,
            distance
        );

        Ok(ReviewReceipt {
            review_id,
            points,
            distance,
        })
    }

    /// Upload every photo. If any upload fails the ones that succeeded are
    /// removed again.
    async fn store_images(
        &self,
        owner: &str,
        images: Vec<ProcessedImage>,
    ) -> Result<Vec<StoredImage>> {
        let results: Vec<Result<StoredImage>> = stream::iter(images)
            .map(|image| self.images.store(owner, image))
            .buffered(IMAGE_UPLOAD_CONCURRENCY)
            .collect()
            .await;

        let mut stored = Vec::with_capacity(results.len());
        let mut failure = None;
        for result in results {
            match result {
                Ok(image) => stored.push(image),
                Err(e) if failure.is_none() => failure = Some(e),
                Err(e) => tracing::warn!("Additional photo upload failure: {:?}", e),
            }
        }

        match failure {
            Some(e) => {
                self.discard_images(&stored).await;
                Err(e)
            }
            None => Ok(stored),
        }
    }

    /// Best-effort removal of photos that no review will reference
    async fn discard_images(&self, stored: &[StoredImage]) {
        let removals = join_all(stored.iter().map(|image| self.images.remove(&image.key))).await;

        for (image, result) in stored.iter().zip(removals) {
            if let Err(e) = result {
                tracing::warn!("Failed to remove orphaned photo {}: {:?}", image.key, e);
            }
        }
    }

    /// Every review by the user, newest first
    pub async fn history(&self, user_id: Option<&str>) -> Result<Vec<ReviewHistoryEntry>> {
        let user_id = user_id
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .ok_or_else(|| AppError::Validation("userId is required".to_string()))?;

        self.reviews.list_history(user_id).await
    }
}
