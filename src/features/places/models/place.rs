use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::shared::geo::Coordinates;

/// Workflow state of a civic issue as reported by the ingestion process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PlaceState {
    Start,
    Inprogress,
    Forward,
    Finish,
    Irrelevant,
}

impl PlaceState {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlaceState::Start => "start",
            PlaceState::Inprogress => "inprogress",
            PlaceState::Forward => "forward",
            PlaceState::Finish => "finish",
            PlaceState::Irrelevant => "irrelevant",
        }
    }
}

impl std::fmt::Display for PlaceState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlaceState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "start" => Ok(PlaceState::Start),
            "inprogress" => Ok(PlaceState::Inprogress),
            "forward" => Ok(PlaceState::Forward),
            "finish" => Ok(PlaceState::Finish),
            "irrelevant" => Ok(PlaceState::Irrelevant),
            other => Err(format!("Unknown place state '{}'", other)),
        }
    }
}

/// A civic issue report ("place").
///
/// Built from a `traffy_data` row at the store boundary: the legacy
/// `"lat,lng"` text column is parsed once into `coordinates`, which is `None`
/// when the stored value is missing or invalid.
#[derive(Debug, Clone)]
pub struct Place {
    pub id: i64,
    pub ticket_id: Option<String>,
    pub place_type: Option<String>,
    pub organization: Option<String>,
    pub organization_action: Option<String>,
    pub comment: Option<String>,
    pub coordinates: Option<Coordinates>,
    pub photo: Option<String>,
    pub photo_after: Option<String>,
    pub address: Option<String>,
    pub subdistrict: Option<String>,
    pub district: Option<String>,
    pub province: Option<String>,
    pub timestamp: Option<DateTime<Utc>>,
    pub timestamp_inprogress: Option<DateTime<Utc>>,
    pub timestamp_finished: Option<DateTime<Utc>>,
    pub last_activity: Option<DateTime<Utc>>,
    pub state: Option<PlaceState>,
    pub star: Option<f64>,
    pub count_reopen: i32,
    pub duration_minutes_inprogress: Option<i32>,
    pub duration_minutes_finished: Option<i32>,
    pub duration_minutes_total: Option<i32>,
    pub view_count: i32,
    pub total_point: i32,
    pub likes: i32,
    pub dislikes: i32,
}

/// A place annotated with its distance from a caller-supplied reference point
#[derive(Debug, Clone)]
pub struct LocatedPlace {
    pub place: Place,
    pub distance: f64,
}
