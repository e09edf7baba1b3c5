//! Geodesic helpers shared by every feature that deals with coordinates.
//!
//! All distances in the service go through [`haversine_distance`]; there is no
//! second (store-side) formula.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::core::error::AppError;
use crate::shared::constants::EARTH_RADIUS_METERS;

/// A validated WGS84 coordinate pair in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    /// Build a coordinate pair, rejecting non-finite or out-of-range values
    pub fn new(lat: f64, lng: f64) -> Option<Self> {
        let valid = lat.is_finite()
            && lng.is_finite()
            && (-90.0..=90.0).contains(&lat)
            && (-180.0..=180.0).contains(&lng);

        valid.then_some(Self { lat, lng })
    }

    /// Parse request parameters. Both values must be present and numeric.
    pub fn from_params(lat: Option<&str>, lng: Option<&str>) -> Result<Self, AppError> {
        let parse = |value: Option<&str>| {
            value
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .and_then(|v| v.parse::<f64>().ok())
        };

        match (parse(lat), parse(lng)) {
            (Some(lat), Some(lng)) => Self::new(lat, lng),
            _ => None,
        }
        .ok_or_else(|| AppError::Validation("Invalid coordinates".to_string()))
    }

    /// Parse the legacy `"lat,lng"` column format
    pub fn parse_delimited(raw: &str) -> Option<Self> {
        let (lat, lng) = raw.split_once(',')?;
        Self::new(lat.trim().parse().ok()?, lng.trim().parse().ok()?)
    }

    /// Build from a GeoJSON position (`[lng, lat]`)
    pub fn from_geojson_position(position: &[f64]) -> Option<Self> {
        match position {
            [lng, lat, ..] => Self::new(*lat, *lng),
            _ => None,
        }
    }

    pub fn distance_to(&self, other: &Coordinates) -> f64 {
        haversine_distance(self, other)
    }
}

/// Great-circle distance in meters between two points
pub fn haversine_distance(a: &Coordinates, b: &Coordinates) -> f64 {
    let phi1 = a.lat.to_radians();
    let phi2 = b.lat.to_radians();
    let d_phi = (b.lat - a.lat).to_radians();
    let d_lambda = (b.lng - a.lng).to_radians();

    let h = (d_phi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    // Rounding can push h just past 1 for near-antipodal points
    let h = h.clamp(0.0, 1.0);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_METERS * c
}

/// Radius search predicate: strictly inside
pub fn within_radius(distance_meters: f64, radius_meters: i64) -> bool {
    distance_meters < radius_meters as f64
}

/// Parse a caller-supplied radius. Anything that is not a positive integer
/// (decimals are truncated) falls back to `default`.
pub fn parse_radius(raw: Option<&str>, default: i64) -> i64 {
    let Some(raw) = raw.map(str::trim).filter(|r| !r.is_empty()) else {
        return default;
    };

    let parsed = raw.parse::<i64>().ok().or_else(|| {
        raw.parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .map(|v| v.trunc() as i64)
    });

    match parsed {
        Some(radius) if radius > 0 => radius,
        _ => default,
    }
}

/// Human-readable distance: whole kilometers (floored) and remaining meters (rounded)
pub fn format_distance(distance_meters: f64) -> String {
    let km = (distance_meters / 1000.0).floor();
    let meters = (distance_meters - km * 1000.0).round();
    format!("{} km {} m", km as i64, meters as i64)
}

/// Round to two decimal places for presentation
pub fn round_to_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
