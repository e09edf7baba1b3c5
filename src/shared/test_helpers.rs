//! In-memory stand-ins for the MySQL repositories and the photo store, plus
//! routers wired to them for handler tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::Router;
use chrono::{DateTime, TimeZone, Utc};
use fake::faker::lorem::en::Sentence;
use fake::faker::name::en::Name;
use fake::Fake;

use crate::core::config::PlacesConfig;
use crate::core::error::{AppError, Result};
use crate::features::categories::models::Category;
use crate::features::categories::repositories::CategoryRepository;
use crate::features::categories::CategoryService;
use crate::features::places::models::{Place, PlaceFilter, PlaceState, StateFilter};
use crate::features::places::repositories::PlaceRepository;
use crate::features::places::{self, PlaceService};
use crate::features::reviews::models::{
    CreateReview, ReviewComment, ReviewHistoryEntry, ReviewStats, ReviewStatus,
};
use crate::features::reviews::repositories::ReviewRepository;
use crate::features::reviews::services::{ReviewAggregator, ReviewService};
use crate::features::{categories, dashboard, reviews};
use crate::modules::images::{ImageStore, ProcessedImage, StoredImage, UploadedImage};
use crate::shared::geo::Coordinates;

#[derive(Debug, Clone)]
struct StoredReview {
    id: i64,
    review: CreateReview,
}

/// Shared in-memory backing for both repositories
#[derive(Default)]
pub struct InMemoryStore {
    places: Mutex<Vec<Place>>,
    reviews: Mutex<Vec<StoredReview>>,
    points: Mutex<HashMap<String, i64>>,
    categories: Mutex<Vec<Category>>,
    queries: AtomicUsize,
    fail_writes: Mutex<bool>,
}

impl InMemoryStore {
    pub fn add_place(&self, place: Place) {
        self.places.lock().unwrap().push(place);
    }

    /// Insert a review directly, without touching the ledger
    pub fn add_review(&self, review: CreateReview) -> i64 {
        let mut reviews = self.reviews.lock().unwrap();
        let id = reviews.len() as i64 + 1;
        reviews.push(StoredReview { id, review });
        id
    }

    pub fn add_category(&self, id: i64, name: &str) {
        self.categories.lock().unwrap().push(Category {
            id,
            name: name.to_string(),
        });
    }

    pub fn set_points(&self, user_id: &str, points: i64) {
        self.points.lock().unwrap().insert(user_id.to_string(), points);
    }

    pub fn points_of(&self, user_id: &str) -> Option<i64> {
        self.points.lock().unwrap().get(user_id).copied()
    }

    pub fn review_count(&self) -> usize {
        self.reviews.lock().unwrap().len()
    }

    /// Make the next review write fail as a database error would
    pub fn fail_writes(&self) {
        *self.fail_writes.lock().unwrap() = true;
    }

    /// Number of repository calls served so far
    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }

    fn record_query(&self) {
        self.queries.fetch_add(1, Ordering::SeqCst);
    }

    fn reviews_of(&self, place_id: i64) -> Vec<StoredReview> {
        let mut reviews: Vec<StoredReview> = self
            .reviews
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.review.place_id == place_id)
            .cloned()
            .collect();
        reviews.sort_by_key(|r| (r.review.created_at, r.id));
        reviews
    }
}

fn contains_ci(value: &Option<String>, term: &str) -> bool {
    value
        .as_deref()
        .map(|v| v.to_lowercase().contains(&term.to_lowercase()))
        .unwrap_or(false)
}

fn matches_filter(place: &Place, filter: &PlaceFilter) -> bool {
    if let Some(term) = &filter.search_term {
        if !(contains_ci(&place.ticket_id, term)
            || contains_ci(&place.comment, term)
            || contains_ci(&place.organization, term))
        {
            return false;
        }
    }

    if let Some(case_type) = &filter.case_type {
        if !contains_ci(&place.place_type, case_type) {
            return false;
        }
    }

    let finished = place.state == Some(PlaceState::Finish);
    match filter.state {
        Some(StateFilter::Finished) if !finished => return false,
        Some(StateFilter::NotFinished) if finished => return false,
        _ => {}
    }

    if let Some(date) = filter.finished_date {
        if place.timestamp_finished.map(|t| t.date_naive()) != Some(date) {
            return false;
        }
    }

    true
}

#[async_trait]
impl PlaceRepository for InMemoryStore {
    async fn scan(&self, filter: &PlaceFilter) -> Result<Vec<Place>> {
        self.record_query();
        Ok(self
            .places
            .lock()
            .unwrap()
            .iter()
            .filter(|p| matches_filter(p, filter))
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Place>> {
        self.record_query();
        Ok(self
            .places
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == id)
            .cloned())
    }
}

#[async_trait]
impl ReviewRepository for InMemoryStore {
    async fn list_investigators(&self, place_id: i64) -> Result<Vec<String>> {
        self.record_query();
        Ok(self
            .reviews_of(place_id)
            .into_iter()
            .map(|r| r.review.display_name)
            .collect())
    }

    async fn review_stats(&self, place_id: i64) -> Result<ReviewStats> {
        self.record_query();
        let reviews = self.reviews_of(place_id);
        let total = reviews.len() as i64;
        let count = |status: ReviewStatus| {
            reviews
                .iter()
                .filter(|r| r.review.review_status == status)
                .count() as i64
        };
        let average_stars = (total > 0).then(|| {
            reviews.iter().map(|r| r.review.stars as f64).sum::<f64>() / total as f64
        });

        Ok(ReviewStats {
            total,
            pass_count: count(ReviewStatus::Pass),
            fail_count: count(ReviewStatus::Fail),
            average_stars,
        })
    }

    async fn list_comments(
        &self,
        place_id: i64,
        status: ReviewStatus,
    ) -> Result<Vec<ReviewComment>> {
        self.record_query();
        Ok(self
            .reviews_of(place_id)
            .into_iter()
            .filter(|r| r.review.review_status == status)
            .filter_map(|r| {
                let text = r.review.comment.filter(|c| !c.trim().is_empty())?;
                Some(ReviewComment {
                    text,
                    author: r.review.display_name,
                    created_at: r.review.created_at,
                })
            })
            .collect())
    }

    async fn create_with_points(&self, review: &CreateReview, points: i64) -> Result<i64> {
        self.record_query();
        if *self.fail_writes.lock().unwrap() {
            return Err(AppError::Database(sqlx::Error::PoolTimedOut));
        }

        let id = self.add_review(review.clone());
        *self
            .points
            .lock()
            .unwrap()
            .entry(review.user_id.clone())
            .or_insert(0) += points;
        Ok(id)
    }

    async fn list_history(&self, user_id: &str) -> Result<Vec<ReviewHistoryEntry>> {
        self.record_query();
        let places = self.places.lock().unwrap().clone();
        let mut reviews: Vec<StoredReview> = self
            .reviews
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.review.user_id == user_id)
            .cloned()
            .collect();
        reviews.sort_by_key(|r| std::cmp::Reverse((r.review.created_at, r.id)));

        Ok(reviews
            .into_iter()
            .filter_map(|stored| {
                let place = places.iter().find(|p| p.id == stored.review.place_id)?;
                let review = stored.review;
                Some(ReviewHistoryEntry {
                    review_id: stored.id,
                    place_id: place.id,
                    ticket_id: place.ticket_id.clone(),
                    place_type: place.place_type.clone(),
                    organization: place.organization.clone(),
                    place_comment: place.comment.clone(),
                    address: place.address.clone(),
                    district: place.district.clone(),
                    province: place.province.clone(),
                    place_state: place.state,
                    photo: place.photo.clone(),
                    review_status: Some(review.review_status),
                    stars: review.stars,
                    comment: review.comment,
                    images: review.images,
                    distance: review.distance,
                    created_at: review.created_at,
                })
            })
            .collect())
    }

    async fn get_user_points(&self, user_id: &str) -> Result<Option<i64>> {
        self.record_query();
        Ok(self.points_of(user_id))
    }
}

#[async_trait]
impl CategoryRepository for InMemoryStore {
    async fn list_all(&self) -> Result<Vec<Category>> {
        self.record_query();
        let mut categories = self.categories.lock().unwrap().clone();
        categories.sort_by_key(|c| c.id);
        Ok(categories)
    }
}

/// Bytes the fake photo store refuses to decode
pub const CORRUPT_IMAGE: &[u8] = b"corrupt";

/// Photo store that keeps object keys in memory and hands out predictable URLs
#[derive(Default)]
pub struct FakeImageStore {
    objects: Mutex<Vec<String>>,
    uploads: AtomicUsize,
    removals: AtomicUsize,
}

impl FakeImageStore {
    /// Objects currently held
    pub fn stored_count(&self) -> usize {
        self.objects.lock().unwrap().len()
    }

    /// Uploads ever made, including ones removed later
    pub fn upload_count(&self) -> usize {
        self.uploads.load(Ordering::SeqCst)
    }

    pub fn removal_count(&self) -> usize {
        self.removals.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ImageStore for FakeImageStore {
    async fn process(&self, image: UploadedImage) -> Result<ProcessedImage> {
        if image.data == CORRUPT_IMAGE {
            return Err(AppError::Validation(format!(
                "Unreadable image: {}",
                image.file_name
            )));
        }
        Ok(ProcessedImage {
            source_size: image.data.len(),
            jpeg: image.data,
        })
    }

    async fn store(&self, owner: &str, _image: ProcessedImage) -> Result<StoredImage> {
        let n = self.uploads.fetch_add(1, Ordering::SeqCst);
        let key = format!("reviews/{}/{}.jpg", owner, n);
        self.objects.lock().unwrap().push(key.clone());
        Ok(StoredImage {
            url: format!("http://images.test/{}", key),
            key,
        })
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.removals.fetch_add(1, Ordering::SeqCst);
        self.objects.lock().unwrap().retain(|k| k != key);
        Ok(())
    }
}

/// A place at the given coordinate with generated descriptive fields
pub fn sample_place(id: i64, lat: f64, lng: f64) -> Place {
    Place {
        id,
        ticket_id: Some(format!("2024-TEST{:04}", id)),
        place_type: Some("{ถนน}".to_string()),
        organization: Some(Name().fake()),
        organization_action: None,
        comment: Some(Sentence(3..6).fake()),
        coordinates: Coordinates::new(lat, lng),
        photo: Some(format!("http://photos.test/{}.jpg", id)),
        photo_after: None,
        address: None,
        subdistrict: None,
        district: Some("Pathum Wan".to_string()),
        province: Some("Bangkok".to_string()),
        timestamp: None,
        timestamp_inprogress: None,
        timestamp_finished: None,
        last_activity: None,
        state: Some(PlaceState::Finish),
        star: None,
        count_reopen: 0,
        duration_minutes_inprogress: None,
        duration_minutes_finished: None,
        duration_minutes_total: None,
        view_count: 0,
        total_point: 0,
        likes: 0,
        dislikes: 0,
    }
}

pub fn sample_review(
    place_id: i64,
    user_id: &str,
    display_name: &str,
    status: ReviewStatus,
    stars: i32,
    comment: Option<&str>,
) -> CreateReview {
    CreateReview {
        place_id,
        user_id: user_id.to_string(),
        display_name: display_name.to_string(),
        review_status: status,
        stars,
        comment: comment.map(String::from),
        images: Vec::new(),
        latitude: 13.7563,
        longitude: 100.5018,
        distance: 0.0,
        created_at: fixed_time(),
    }
}

pub fn fixed_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
}

pub fn places_router(store: Arc<InMemoryStore>) -> Router {
    let aggregator = Arc::new(ReviewAggregator::new(store.clone()));
    let service = Arc::new(PlaceService::new(store, aggregator, PlacesConfig::default()));
    places::routes(service)
}

pub fn reviews_router(store: Arc<InMemoryStore>, images: Arc<FakeImageStore>) -> Router {
    let service = Arc::new(ReviewService::new(store.clone(), store, images));
    reviews::routes(service)
}

pub fn dashboard_router(store: Arc<InMemoryStore>) -> Router {
    let service = Arc::new(dashboard::DashboardService::new(store));
    dashboard::routes(service)
}

pub fn categories_router(store: Arc<InMemoryStore>) -> Router {
    categories::routes(Arc::new(CategoryService::new(store)))
}
