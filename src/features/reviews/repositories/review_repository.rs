use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use sqlx::{FromRow, MySqlPool};

use crate::core::error::{AppError, Result};
use crate::features::reviews::models::{
    decode_image_list, encode_image_list, CreateReview, ReviewComment, ReviewHistoryEntry,
    ReviewStats, ReviewStatus,
};

/// Storage for reviews and the per-user points ledger
#[async_trait]
pub trait ReviewRepository: Send + Sync {
    /// Display name of every review on the place, oldest first
    async fn list_investigators(&self, place_id: i64) -> Result<Vec<String>>;

    async fn review_stats(&self, place_id: i64) -> Result<ReviewStats>;

    /// Non-empty comments of reviews with the given verdict, oldest first
    async fn list_comments(&self, place_id: i64, status: ReviewStatus)
        -> Result<Vec<ReviewComment>>;

    /// Insert the review and add `points` to the author's ledger as one unit.
    /// Returns the new review id.
    async fn create_with_points(&self, review: &CreateReview, points: i64) -> Result<i64>;

    /// Every review written by the user, newest first
    async fn list_history(&self, user_id: &str) -> Result<Vec<ReviewHistoryEntry>>;

    /// Ledger total, `None` when the user has never been awarded points
    async fn get_user_points(&self, user_id: &str) -> Result<Option<i64>>;
}

#[derive(Debug, FromRow)]
struct ReviewStatsRow {
    total: i64,
    pass_count: i64,
    fail_count: i64,
    average_stars: Option<Decimal>,
}

impl From<ReviewStatsRow> for ReviewStats {
    fn from(row: ReviewStatsRow) -> Self {
        Self {
            total: row.total,
            pass_count: row.pass_count,
            fail_count: row.fail_count,
            average_stars: row.average_stars.and_then(|avg| avg.to_f64()),
        }
    }
}

#[derive(Debug, FromRow)]
struct ReviewCommentRow {
    text: String,
    author: String,
    created_at: DateTime<Utc>,
}

#[derive(Debug, FromRow)]
struct ReviewHistoryRow {
    review_id: i64,
    place_id: i64,
    ticket_id: Option<String>,
    place_type: Option<String>,
    organization: Option<String>,
    place_comment: Option<String>,
    address: Option<String>,
    district: Option<String>,
    province: Option<String>,
    place_state: Option<String>,
    photo: Option<String>,
    review_status: String,
    stars: i32,
    comment: Option<String>,
    images: Option<String>,
    distance: f64,
    created_at: DateTime<Utc>,
}

impl From<ReviewHistoryRow> for ReviewHistoryEntry {
    fn from(row: ReviewHistoryRow) -> Self {
        Self {
            review_id: row.review_id,
            place_id: row.place_id,
            ticket_id: row.ticket_id,
            place_type: row.place_type,
            organization: row.organization,
            place_comment: row.place_comment,
            address: row.address,
            district: row.district,
            province: row.province,
            place_state: row.place_state.as_deref().and_then(|s| s.parse().ok()),
            photo: row.photo,
            review_status: row.review_status.parse().ok(),
            stars: row.stars,
            comment: row.comment,
            images: decode_image_list(row.images.as_deref()),
            distance: row.distance,
            created_at: row.created_at,
        }
    }
}

/// MySQL-backed review repository
pub struct MySqlReviewRepository {
    pool: MySqlPool,
}

impl MySqlReviewRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReviewRepository for MySqlReviewRepository {
    async fn list_investigators(&self, place_id: i64) -> Result<Vec<String>> {
        sqlx::query_scalar::<_, String>(
            r#"
            SELECT display_name
            FROM reviews
            WHERE place_id = ?
            ORDER BY created_at, id
            "#,
        )
        .bind(place_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list investigators for place {}: {:?}", place_id, e);
            AppError::Database(e)
        })
    }

    async fn review_stats(&self, place_id: i64) -> Result<ReviewStats> {
        let row = sqlx::query_as::<_, ReviewStatsRow>(
            r#"
            SELECT
                COUNT(*) AS total,
                COUNT(CASE WHEN review_status = 'pass' THEN 1 END) AS pass_count,
                COUNT(CASE WHEN review_status = 'fail' THEN 1 END) AS fail_count,
                AVG(stars) AS average_stars
            FROM reviews
            WHERE place_id = ?
            "#,
        )
        .bind(place_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get review stats for place {}: {:?}", place_id, e);
            AppError::Database(e)
        })?;

        Ok(row.into())
    }

    async fn list_comments(
        &self,
        place_id: i64,
        status: ReviewStatus,
    ) -> Result<Vec<ReviewComment>> {
        let rows = sqlx::query_as::<_, ReviewCommentRow>(
            r#"
            SELECT comment AS text, display_name AS author, created_at
            FROM reviews
            WHERE place_id = ?
              AND review_status = ?
              AND comment IS NOT NULL
              AND TRIM(comment) <> ''
            ORDER BY created_at, id
            "#,
        )
        .bind(place_id)
        .bind(status.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list {} comments for place {}: {:?}", status, place_id, e);
            AppError::Database(e)
        })?;

        Ok(rows
            .into_iter()
            .map(|row| ReviewComment {
                text: row.text,
                author: row.author,
                created_at: row.created_at,
            })
            .collect())
    }

    async fn create_with_points(&self, review: &CreateReview, points: i64) -> Result<i64> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            INSERT INTO reviews
                (place_id, user_id, display_name, review_status, stars, comment, images,
                 latitude, longitude, distance, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(review.place_id)
        .bind(&review.user_id)
        .bind(&review.display_name)
        .bind(review.review_status.as_str())
        .bind(review.stars)
        .bind(&review.comment)
        .bind(encode_image_list(&review.images))
        .bind(review.latitude)
        .bind(review.longitude)
        .bind(review.distance)
        .bind(review.created_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            tracing::error!("Failed to insert review for place {}: {:?}", review.place_id, e);
            AppError::Database(e)
        })?;

        sqlx::query(
            r#"
            INSERT INTO user_points (user_id, points)
            VALUES (?, ?)
            ON DUPLICATE KEY UPDATE points = points + ?
            "#,
        )
        .bind(&review.user_id)
        .bind(points)
        .bind(points)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            tracing::error!("Failed to credit {} points to {}: {:?}", points, review.user_id, e);
            AppError::Database(e)
        })?;

        tx.commit().await?;

        Ok(result.last_insert_id() as i64)
    }

    async fn list_history(&self, user_id: &str) -> Result<Vec<ReviewHistoryEntry>> {
        let rows = sqlx::query_as::<_, ReviewHistoryRow>(
            r#"
            SELECT
                r.id AS review_id,
                r.place_id,
                t.ticket_id,
                t.`type` AS place_type,
                t.organization,
                t.comment AS place_comment,
                t.address,
                t.district,
                t.province,
                t.state AS place_state,
                t.photo,
                r.review_status,
                r.stars,
                r.comment,
                r.images,
                r.distance,
                r.created_at
            FROM reviews r
            JOIN traffy_data t ON t.id = r.place_id
            WHERE r.user_id = ?
            ORDER BY r.created_at DESC, r.id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list review history for {}: {:?}", user_id, e);
            AppError::Database(e)
        })?;

        Ok(rows.into_iter().map(ReviewHistoryEntry::from).collect())
    }

    async fn get_user_points(&self, user_id: &str) -> Result<Option<i64>> {
        sqlx::query_scalar::<_, i64>("SELECT points FROM user_points WHERE user_id = ?")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to get points for {}: {:?}", user_id, e);
                AppError::Database(e)
            })
    }
}
