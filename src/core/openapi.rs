use utoipa::{Modify, OpenApi};

use crate::features::categories::{dtos as categories_dtos, handlers as categories_handlers};
use crate::features::dashboard::{dtos as dashboard_dtos, handlers as dashboard_handlers};
use crate::features::line_auth::{
    clients as line_clients, dtos as line_dtos, handlers as line_handlers,
};
use crate::features::places::{
    dtos as places_dtos, handlers as places_handlers, models as places_models,
};
use crate::features::reviews::{
    dtos as reviews_dtos, handlers as reviews_handlers, models as reviews_models,
};
use crate::features::traffy::{
    dtos as traffy_dtos, handlers as traffy_handlers, models as traffy_models,
};
use crate::shared::geo::Coordinates;
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Places
        places_handlers::get_nearby_places,
        places_handlers::search_places,
        // Reviews
        reviews_handlers::save_review,
        reviews_handlers::get_review_history,
        // Dashboard
        dashboard_handlers::get_user_dashboard,
        // Categories
        categories_handlers::list_categories,
        // Traffy proxy
        traffy_handlers::get_start_reports,
        traffy_handlers::get_inprogress_reports,
        traffy_handlers::get_nearby_reports,
        // LINE Login
        line_handlers::line_callback,
    ),
    components(
        schemas(
            // Shared
            Meta,
            Coordinates,
            // Places
            places_models::PlaceState,
            places_dtos::PlaceResponseDto,
            ApiResponse<Vec<places_dtos::PlaceResponseDto>>,
            // Reviews
            reviews_models::ReviewStatus,
            reviews_dtos::SaveReviewFormDoc,
            reviews_dtos::PointsEarnedDto,
            reviews_dtos::SaveReviewResponseDto,
            reviews_dtos::ReviewSummaryDto,
            reviews_dtos::ReviewCommentDto,
            reviews_dtos::ReviewHistoryDto,
            ApiResponse<reviews_dtos::SaveReviewResponseDto>,
            ApiResponse<Vec<reviews_dtos::ReviewHistoryDto>>,
            // Dashboard
            dashboard_dtos::UserDashboardDto,
            ApiResponse<dashboard_dtos::UserDashboardDto>,
            // Categories
            categories_dtos::CategoryResponseDto,
            ApiResponse<Vec<categories_dtos::CategoryResponseDto>>,
            // Traffy proxy
            traffy_models::TraffyState,
            traffy_dtos::TraffyFeedDto,
            traffy_dtos::NearbyFeaturesDto,
            ApiResponse<traffy_dtos::NearbyFeaturesDto>,
            // LINE Login
            line_clients::LineProfile,
            line_dtos::LineLoginDto,
            ApiResponse<line_dtos::LineLoginDto>,
        )
    ),
    tags(
        (name = "places", description = "Civic issue places near a coordinate, with review data"),
        (name = "reviews", description = "Field reviews of resolved places and review history"),
        (name = "dashboard", description = "Per-user points"),
        (name = "categories", description = "Issue categories"),
        (name = "traffy", description = "Proxy to the public Traffy Fondue API"),
        (name = "auth", description = "LINE Login"),
    ),
    info(
        title = "Traffy Fondue API",
        version = "0.1.0",
        description = "API documentation for the Traffy Fondue companion app",
    )
)]
pub struct ApiDoc;

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
