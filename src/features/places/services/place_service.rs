use std::sync::Arc;

use futures::{stream, StreamExt, TryStreamExt};

use crate::core::config::PlacesConfig;
use crate::core::error::{AppError, Result};
use crate::features::places::models::{LocatedPlace, Place, PlaceFilter};
use crate::features::places::repositories::PlaceRepository;
use crate::features::reviews::models::PlaceReviews;
use crate::features::reviews::services::ReviewAggregator;
use crate::shared::geo::{haversine_distance, within_radius, Coordinates};

/// A located place together with its review data
#[derive(Debug, Clone)]
pub struct EnrichedPlace {
    pub located: LocatedPlace,
    pub reviews: PlaceReviews,
}

/// Keep places strictly inside `radius_meters` of `center`, nearest first.
/// Places without usable coordinates are skipped; ties keep storage order.
pub fn locate_places(
    places: Vec<Place>,
    center: &Coordinates,
    radius_meters: i64,
) -> Vec<LocatedPlace> {
    let mut located: Vec<LocatedPlace> = places
        .into_iter()
        .filter_map(|place| {
            let distance = haversine_distance(center, place.coordinates.as_ref()?);
            within_radius(distance, radius_meters).then_some(LocatedPlace { place, distance })
        })
        .collect();

    located.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    located
}

/// Radius search over stored places
pub struct PlaceService {
    repository: Arc<dyn PlaceRepository>,
    aggregator: Arc<ReviewAggregator>,
    config: PlacesConfig,
}

impl PlaceService {
    pub fn new(
        repository: Arc<dyn PlaceRepository>,
        aggregator: Arc<ReviewAggregator>,
        config: PlacesConfig,
    ) -> Self {
        Self {
            repository,
            aggregator,
            config,
        }
    }

    pub fn default_radius(&self) -> i64 {
        self.config.default_radius_meters
    }

    /// Every place within the radius, nearest first
    pub async fn find_nearby(
        &self,
        center: Coordinates,
        radius_meters: i64,
    ) -> Result<Vec<EnrichedPlace>> {
        self.search(&PlaceFilter::default(), center, radius_meters).await
    }

    /// Places matching `filter` within the radius, nearest first
    pub async fn search(
        &self,
        filter: &PlaceFilter,
        center: Coordinates,
        radius_meters: i64,
    ) -> Result<Vec<EnrichedPlace>> {
        let candidates = self.repository.scan(filter).await?;
        let scanned = candidates.len();
        let located = locate_places(candidates, &center, radius_meters);

        tracing::debug!(
            "Located {} of {} places within {} m of ({}, {})",
            located.len(),
            scanned,
            radius_meters,
            center.lat,
            center.lng
        );

        self.enrich(located).await
    }

    /// Attach review data, a bounded number of places at a time, keeping order
    async fn enrich(&self, located: Vec<LocatedPlace>) -> Result<Vec<EnrichedPlace>> {
        stream::iter(located)
            .map(|located| async move {
                let reviews = self.aggregator.for_place(located.place.id).await?;
                Ok::<_, AppError>(EnrichedPlace { located, reviews })
            })
            .buffered(self.config.enrich_concurrency.max(1))
            .try_collect()
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn place(id: i64, coords: Option<(f64, f64)>) -> Place {
        Place {
            id,
            ticket_id: None,
            place_type: None,
            organization: None,
            organization_action: None,
            comment: None,
            coordinates: coords.and_then(|(lat, lng)| Coordinates::new(lat, lng)),
            photo: None,
            photo_after: None,
            address: None,
            subdistrict: None,
            district: None,
            province: None,
            timestamp: None,
            timestamp_inprogress: None,
            timestamp_finished: None,
            last_activity: None,
            state: None,
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

    #[test]
    fn test_locate_orders_by_distance_and_filters_radius() {
        let center = Coordinates::new(13.7563, 100.5018).unwrap();
        let places = vec![
            place(1, Some((13.7800, 100.5018))), // ~2.6 km
            place(2, Some((13.7563, 100.5018))), // 0 m
            place(3, Some((14.5000, 100.5018))), // ~83 km
            place(4, None),
            place(5, Some((13.7600, 100.5018))), // ~400 m
        ];

        let located = locate_places(places, &center, 25_000);
        let ids: Vec<i64> = located.iter().map(|l| l.place.id).collect();

        assert_eq!(ids, vec![2, 5, 1]);
        assert!(located.windows(2).all(|w| w[0].distance <= w[1].distance));
        assert!(located.iter().all(|l| l.distance < 25_000.0));
    }

    #[test]
    fn test_locate_excludes_radius_boundary() {
        let center = Coordinates::new(0.0, 0.0).unwrap();
        let target = place(1, Some((0.0, 0.001)));
        let distance = haversine_distance(&center, &target.coordinates.unwrap());

        let exact = distance.ceil() as i64;
        assert_eq!(locate_places(vec![target.clone()], &center, exact).len(), 1);
        assert!(locate_places(vec![target], &center, distance.floor() as i64).is_empty());
    }

    #[test]
    fn test_locate_keeps_storage_order_for_ties() {
        let center = Coordinates::new(13.0, 100.0).unwrap();
        let places = vec![
            place(9, Some((13.01, 100.0))),
            place(3, Some((13.01, 100.0))),
        ];

        let ids: Vec<i64> = locate_places(places, &center, 5_000)
            .iter()
            .map(|l| l.place.id)
            .collect();
        assert_eq!(ids, vec![9, 3]);
    }
}
