use std::sync::Arc;

use serde_json::Value;

use crate::core::error::Result;
use crate::features::traffy::clients::TraffyClient;
use crate::features::traffy::models::TraffyState;
use crate::shared::geo::{within_radius, Coordinates};

/// Position of a GeoJSON point feature, if it has a usable one
fn feature_position(feature: &Value) -> Option<Coordinates> {
    let position: Vec<f64> = feature
        .get("geometry")?
        .get("coordinates")?
        .as_array()?
        .iter()
        .map(Value::as_f64)
        .collect::<Option<_>>()?;

    Coordinates::from_geojson_position(&position)
}

/// Keep features strictly inside the radius, in upstream order.
/// Features without a valid point geometry are dropped.
pub fn filter_features_within(
    features: Vec<Value>,
    center: &Coordinates,
    radius_meters: i64,
) -> Vec<Value> {
    features
        .into_iter()
        .filter(|feature| {
            feature_position(feature)
                .map(|position| within_radius(center.distance_to(&position), radius_meters))
                .unwrap_or(false)
        })
        .collect()
}

/// Proxy over the public civic reporting API
pub struct TraffyService {
    client: Arc<TraffyClient>,
    default_radius_meters: i64,
}

impl TraffyService {
    pub fn new(client: Arc<TraffyClient>, default_radius_meters: i64) -> Self {
        Self {
            client,
            default_radius_meters,
        }
    }

    pub fn default_radius(&self) -> i64 {
        self.default_radius_meters
    }

    pub async fn list_by_state(&self, state: TraffyState) -> Result<Value> {
        self.client.fetch_stat(state).await
    }

    /// Reports of the organization in `state` near `center`
    pub async fn nearby(
        &self,
        center: Coordinates,
        radius_meters: i64,
        state: TraffyState,
    ) -> Result<Vec<Value>> {
        let collection = self.client.fetch_org_features(state).await?;
        let total = collection.features.len();
        let nearby = filter_features_within(collection.features, &center, radius_meters);

        tracing::debug!(
            "{} of {} '{}' reports within {} m",
            nearby.len(),
            total,
            state.as_str(),
            radius_meters
        );

        Ok(nearby)
    }
}
