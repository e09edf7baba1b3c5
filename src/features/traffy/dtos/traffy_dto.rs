use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TraffyNearbyQuery {
    pub lat: Option<String>,
    pub lng: Option<String>,
    /// Search radius in meters, defaults to 25000
    pub radius: Option<String>,
    /// "start" or "inprogress"
    pub state: Option<String>,
}

/// Upstream GeoJSON features near the caller
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct NearbyFeaturesDto {
    #[schema(value_type = Vec<Object>)]
    pub features: Vec<Value>,
}

/// Upstream response body, forwarded unchanged
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
#[schema(value_type = Object)]
pub struct TraffyFeedDto(pub Value);
