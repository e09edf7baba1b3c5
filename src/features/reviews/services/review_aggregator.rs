use std::sync::Arc;

use crate::core::error::Result;
use crate::features::reviews::models::{PlaceReviews, ReviewStatus};
use crate::features::reviews::repositories::ReviewRepository;

/// Collects the review data shown alongside a place
pub struct ReviewAggregator {
    repository: Arc<dyn ReviewRepository>,
}

impl ReviewAggregator {
    pub fn new(repository: Arc<dyn ReviewRepository>) -> Self {
        Self { repository }
    }

    /// The four reads are independent and issued concurrently; each sees the
    /// store as of its own execution.
    pub async fn for_place(&self, place_id: i64) -> Result<PlaceReviews> {
        let (investigators, stats, agree_comments, disagree_comments) = tokio::try_join!(
            self.repository.list_investigators(place_id),
            self.repository.review_stats(place_id),
            self.repository.list_comments(place_id, ReviewStatus::Pass),
            self.repository.list_comments(place_id, ReviewStatus::Fail),
        )?;

        Ok(PlaceReviews {
            investigators,
            stats,
            agree_comments,
            disagree_comments,
        })
    }
}
