use std::sync::Arc;

use axum::{
    extract::{multipart::Field, Multipart, State},
    http::StatusCode,
    Json,
};
use tracing::debug;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppQuery;
use crate::features::reviews::dtos::{
    ReviewHistoryDto, ReviewHistoryQuery, SaveReviewForm, SaveReviewFormDoc,
    SaveReviewResponseDto,
};
use crate::features::reviews::services::ReviewService;
use crate::modules::images::UploadedImage;
use crate::shared::geo::round_to_cents;
use crate::shared::types::{ApiResponse, Meta};

async fn field_text(field: Field<'_>, name: &str) -> Result<String> {
    field
        .text()
        .await
        .map_err(|e| AppError::BadRequest(format!("Failed to read {} field: {}", name, e)))
}

/// Read the multipart body into a raw form. Empty file parts are skipped.
async fn read_form(mut multipart: Multipart) -> Result<SaveReviewForm> {
    let mut form = SaveReviewForm::default();

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        debug!("Failed to read multipart field: {}", e);
        AppError::BadRequest(format!("Failed to read multipart data: {}", e))
    })? {
        let field_name = field.name().unwrap_or("").to_string();

        match field_name.as_str() {
            "images" => {
                let file_name = field.file_name().unwrap_or("").to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let data = field.bytes().await.map_err(|e| {
                    debug!("Failed to read image bytes: {}", e);
                    AppError::BadRequest(format!("Failed to read image data: {}", e))
                })?;

                if data.is_empty() && file_name.is_empty() {
                    continue;
                }

                form.images.push(UploadedImage {
                    file_name,
                    content_type,
                    data: data.to_vec(),
                });
            }
            "placeId" => form.place_id = Some(field_text(field, "placeId").await?),
            "userId" => form.user_id = Some(field_text(field, "userId").await?),
            "displayName" => form.display_name = Some(field_text(field, "displayName").await?),
            "reviewStatus" => form.review_status = Some(field_text(field, "reviewStatus").await?),
            "stars" => form.stars = Some(field_text(field, "stars").await?),
            "comment" => form.comment = Some(field_text(field, "comment").await?),
            "lat" => form.lat = Some(field_text(field, "lat").await?),
            "lng" => form.lng = Some(field_text(field, "lng").await?),
            "timestamp" => form.timestamp = Some(field_text(field, "timestamp").await?),
            _ => {
                debug!("Ignoring unknown field: {}", field_name);
            }
        }
    }

    Ok(form)
}

/// Submit a review
///
/// Records the reviewer's verdict on a place with optional photos and credits
/// points: 10 base, one per kilometer from the place, 5 for a comment and 3
/// per photo.
#[utoipa::path(
    post,
    path = "/save-review",
    tag = "reviews",
    request_body(
        content = SaveReviewFormDoc,
        content_type = "multipart/form-data",
        description = "Review fields and up to 10 JPEG/PNG photos in `images`",
    ),
    responses(
        (status = 201, description = "Review saved", body = ApiResponse<SaveReviewResponseDto>),
        (status = 400, description = "Missing fields, invalid coordinates or invalid input"),
        (status = 404, description = "Place not found"),
        (status = 413, description = "Request body too large"),
        (status = 500, description = "Review could not be stored")
    )
)]
pub async fn save_review(
    State(service): State<Arc<ReviewService>>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<ApiResponse<SaveReviewResponseDto>>)> {
    let form = read_form(multipart).await?;
    let receipt = service.submit(form).await?;

    let response = SaveReviewResponseDto {
        review_id: receipt.review_id,
        points_earned: receipt.points.into(),
        distance: round_to_cents(receipt.distance),
    };

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(response),
            Some("Review saved successfully".to_string()),
            None,
        )),
    ))
}

/// Review history of a user
///
/// Every review the user has written, newest first, with the reviewed place.
#[utoipa::path(
    get,
    path = "/user/review-history",
    params(ReviewHistoryQuery),
    responses(
        (status = 200, description = "Reviews by the user", body = ApiResponse<Vec<ReviewHistoryDto>>),
        (status = 400, description = "userId is missing"),
        (status = 500, description = "Database error")
    ),
    tag = "reviews"
)]
pub async fn get_review_history(
    State(service): State<Arc<ReviewService>>,
    AppQuery(query): AppQuery<ReviewHistoryQuery>,
) -> Result<Json<ApiResponse<Vec<ReviewHistoryDto>>>> {
    let history: Vec<ReviewHistoryDto> = service
        .history(query.user_id.as_deref())
        .await?
        .into_iter()
        .map(Into::into)
        .collect();

    let meta = Meta::for_len(history.len());
    Ok(Json(ApiResponse::success(Some(history), None, Some(meta))))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::http::StatusCode;
    use axum_test::multipart::{MultipartForm, Part};
    use axum_test::TestServer;
    use fake::faker::lorem::en::Sentence;
    use fake::Fake;
    use serde_json::Value;

    use crate::features::reviews::models::ReviewStatus;
    use crate::shared::test_helpers::{
        reviews_router, sample_place, sample_review, FakeImageStore, InMemoryStore, CORRUPT_IMAGE,
    };

    fn setup() -> (Arc<InMemoryStore>, Arc<FakeImageStore>, TestServer) {
        let store = Arc::new(InMemoryStore::default());
        store.add_place(sample_place(1, 13.7563, 100.5018));
        let images = Arc::new(FakeImageStore::default());
        let server = TestServer::new(reviews_router(store.clone(), images.clone())).unwrap();
        (store, images, server)
    }

    fn base_form() -> MultipartForm {
        MultipartForm::new()
            .add_text("placeId", "1")
            .add_text("userId", "U100")
            .add_text("displayName", "Ann")
            .add_text("reviewStatus", "pass")
    }

    #[tokio::test]
    async fn test_minimal_review_earns_base_points() {
        let (store, _, server) = setup();

        let form = base_form()
            .add_text("lat", "13.7563")
            .add_text("lng", "100.5018");
        let response = server.post("/save-review").multipart(form).await;

        response.assert_status(StatusCode::CREATED);
        let body: Value = response.json();
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["points_earned"]["total"], 10);
        assert_eq!(body["data"]["points_earned"]["distance"], 0);
        assert_eq!(body["data"]["distance"], 0.0);
        assert_eq!(store.points_of("U100"), Some(10));
    }

    #[tokio::test]
    async fn test_full_review_scoring_and_ledger_accumulates() {
        let (store, images, server) = setup();
        store.set_points("U100", 7);

        // 0.0225 degrees of latitude is about 2.5 km
        let comment: String = Sentence(3..6).fake();
        let form = base_form()
            .add_text("lat", "13.7788")
            .add_text("lng", "100.5018")
            .add_text("stars", "4")
            .add_text("comment", comment)
            .add_part(
                "images",
                Part::bytes(vec![1, 2, 3]).file_name("a.jpg").mime_type("image/jpeg"),
            )
            .add_part(
                "images",
                Part::bytes(vec![4, 5, 6]).file_name("b.png").mime_type("image/png"),
            );
        let response = server.post("/save-review").multipart(form).await;

        response.assert_status(StatusCode::CREATED);
        let body: Value = response.json();
        let points = &body["data"]["points_earned"];
        assert_eq!(points["distance"], 3);
        assert_eq!(points["comment"], 5);
        assert_eq!(points["image"], 6);
        assert_eq!(points["total"], 24);
        assert_eq!(images.stored_count(), 2);
        assert_eq!(store.points_of("U100"), Some(31));

        let distance = body["data"]["distance"].as_f64().unwrap();
        assert_eq!(distance, (distance * 100.0).round() / 100.0);
    }

    #[tokio::test]
    async fn test_missing_fields_rejected() {
        let (store, _, server) = setup();

        let form = MultipartForm::new()
            .add_text("placeId", "1")
            .add_text("lat", "13.7563")
            .add_text("lng", "100.5018");
        let response = server.post("/save-review").multipart(form).await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body["message"], "Missing required fields");
        assert_eq!(store.review_count(), 0);
    }

    #[tokio::test]
    async fn test_out_of_range_coordinates_rejected_without_queries() {
        let (store, _, server) = setup();

        let form = base_form().add_text("lat", "95").add_text("lng", "100.5018");
        let response = server.post("/save-review").multipart(form).await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body["message"], "Invalid coordinates");
        assert_eq!(store.query_count(), 0);
    }

    #[tokio::test]
    async fn test_unknown_place_is_not_found() {
        let (_, _, server) = setup();

        let form = MultipartForm::new()
            .add_text("placeId", "999")
            .add_text("userId", "U100")
            .add_text("displayName", "Ann")
            .add_text("reviewStatus", "fail")
            .add_text("lat", "13.7563")
            .add_text("lng", "100.5018");
        let response = server.post("/save-review").multipart(form).await;

        response.assert_status(StatusCode::NOT_FOUND);
        let body: Value = response.json();
        assert_eq!(body["message"], "Place not found");
    }

    #[tokio::test]
    async fn test_place_without_coordinates_is_invalid() {
        let (store, _, server) = setup();
        let mut broken = sample_place(2, 0.0, 0.0);
        broken.coordinates = None;
        store.add_place(broken);

        let form = MultipartForm::new()
            .add_text("placeId", "2")
            .add_text("userId", "U100")
            .add_text("displayName", "Ann")
            .add_text("reviewStatus", "pass")
            .add_text("lat", "13.7563")
            .add_text("lng", "100.5018");
        let response = server.post("/save-review").multipart(form).await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body["message"], "Invalid place");
    }

    #[tokio::test]
    async fn test_disallowed_image_type_rejected() {
        let (store, images, server) = setup();

        let form = base_form()
            .add_text("lat", "13.7563")
            .add_text("lng", "100.5018")
            .add_part(
                "images",
                Part::bytes(vec![1, 2, 3]).file_name("a.gif").mime_type("image/gif"),
            );
        let response = server.post("/save-review").multipart(form).await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(images.stored_count(), 0);
        assert_eq!(store.review_count(), 0);
    }

    #[tokio::test]
    async fn test_failed_write_leaves_ledger_untouched() {
        let (store, _, server) = setup();
        store.fail_writes();

        let form = base_form()
            .add_text("lat", "13.7563")
            .add_text("lng", "100.5018");
        let response = server.post("/save-review").multipart(form).await;

        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(store.review_count(), 0);
        assert_eq!(store.points_of("U100"), None);
    }

    #[tokio::test]
    async fn test_failed_write_removes_uploaded_photos() {
        let (store, images, server) = setup();
        store.fail_writes();

        let form = base_form()
            .add_text("lat", "13.7563")
            .add_text("lng", "100.5018")
            .add_part(
                "images",
                Part::bytes(vec![1, 2, 3]).file_name("a.jpg").mime_type("image/jpeg"),
            )
            .add_part(
                "images",
                Part::bytes(vec![4, 5, 6]).file_name("b.jpg").mime_type("image/jpeg"),
            );
        let response = server.post("/save-review").multipart(form).await;

        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(store.review_count(), 0);
        assert_eq!(images.upload_count(), 2);
        assert_eq!(images.removal_count(), 2);
        assert_eq!(images.stored_count(), 0);
    }

    #[tokio::test]
    async fn test_unreadable_photo_rejected_before_any_upload() {
        let (store, images, server) = setup();

        let form = base_form()
            .add_text("lat", "13.7563")
            .add_text("lng", "100.5018")
            .add_part(
                "images",
                Part::bytes(vec![1, 2, 3]).file_name("a.jpg").mime_type("image/jpeg"),
            )
            .add_part(
                "images",
                Part::bytes(CORRUPT_IMAGE.to_vec())
                    .file_name("b.jpg")
                    .mime_type("image/jpeg"),
            );
        let response = server.post("/save-review").multipart(form).await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(images.upload_count(), 0);
        assert_eq!(store.review_count(), 0);
        assert_eq!(store.points_of("U100"), None);
    }

    #[tokio::test]
    async fn test_review_history() {
        let (store, _, server) = setup();
        store.add_place(sample_place(2, 13.7600, 100.5018));
        store.add_review(sample_review(1, "U100", "Ann", ReviewStatus::Pass, 5, Some("ok")));
        let mut later = sample_review(2, "U100", "Ann", ReviewStatus::Fail, 1, None);
        later.created_at += chrono::Duration::hours(1);
        store.add_review(later);
        store.add_review(sample_review(1, "U200", "Bo", ReviewStatus::Pass, 3, None));

        let response = server
            .get("/user/review-history")
            .add_query_param("userId", "U100")
            .await;

        response.assert_status_ok();
        let body: Value = response.json();
        let data = body["data"].as_array().unwrap();
        assert_eq!(data.len(), 2);
        assert_eq!(data[0]["place_id"], 2);
        assert_eq!(data[0]["review_status"], "fail");
        assert_eq!(data[1]["place_id"], 1);
        assert_eq!(data[1]["ticket_id"], "2024-TEST0001");
        assert_eq!(data[1]["images"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_review_history_requires_user() {
        let (_, _, server) = setup();

        let response = server.get("/user/review-history").await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }
}
