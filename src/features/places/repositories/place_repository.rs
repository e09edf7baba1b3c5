use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, MySql, MySqlPool, QueryBuilder};

use crate::core::error::{AppError, Result};
use crate::features::places::models::{Place, PlaceFilter, PlaceState, StateFilter};
use crate::shared::geo::Coordinates;

/// Read access to stored civic issue reports
#[async_trait]
pub trait PlaceRepository: Send + Sync {
    /// Every place with coordinates that satisfies `filter`, in storage order
    async fn scan(&self, filter: &PlaceFilter) -> Result<Vec<Place>>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Place>>;
}

const PLACE_COLUMNS: &str = r#"
    id, ticket_id, `type` AS place_type, organization, organization_action, comment, coords,
    photo, photo_after, address, subdistrict, district, province,
    `timestamp`, timestamp_inprogress, timestamp_finished, last_activity,
    state, star, count_reopen,
    duration_minutes_inprogress, duration_minutes_finished, duration_minutes_total,
    view_count, total_point, likes, dislikes
"#;

/// Raw `traffy_data` row
#[derive(Debug, FromRow)]
struct PlaceRow {
    id: i64,
    ticket_id: Option<String>,
    place_type: Option<String>,
    organization: Option<String>,
    organization_action: Option<String>,
    comment: Option<String>,
    coords: Option<String>,
    photo: Option<String>,
    photo_after: Option<String>,
    address: Option<String>,
    subdistrict: Option<String>,
    district: Option<String>,
    province: Option<String>,
    timestamp: Option<DateTime<Utc>>,
    timestamp_inprogress: Option<DateTime<Utc>>,
    timestamp_finished: Option<DateTime<Utc>>,
    last_activity: Option<DateTime<Utc>>,
    state: Option<String>,
    star: Option<f64>,
    count_reopen: i32,
    duration_minutes_inprogress: Option<i32>,
    duration_minutes_finished: Option<i32>,
    duration_minutes_total: Option<i32>,
    view_count: i32,
    total_point: i32,
    likes: i32,
    dislikes: i32,
}

impl From<PlaceRow> for Place {
    fn from(row: PlaceRow) -> Self {
        let coordinates = row.coords.as_deref().and_then(Coordinates::parse_delimited);
        if coordinates.is_none() {
            tracing::debug!("Place {} has unusable coords {:?}", row.id, row.coords);
        }

        let state = row.state.as_deref().and_then(|s| s.parse::<PlaceState>().ok());

        Self {
            id: row.id,
            ticket_id: row.ticket_id,
            place_type: row.place_type,
            organization: row.organization,
            organization_action: row.organization_action,
            comment: row.comment,
            coordinates,
            photo: row.photo,
            photo_after: row.photo_after,
            address: row.address,
            subdistrict: row.subdistrict,
            district: row.district,
            province: row.province,
            timestamp: row.timestamp,
            timestamp_inprogress: row.timestamp_inprogress,
            timestamp_finished: row.timestamp_finished,
            last_activity: row.last_activity,
            state,
            star: row.star,
            count_reopen: row.count_reopen,
            duration_minutes_inprogress: row.duration_minutes_inprogress,
            duration_minutes_finished: row.duration_minutes_finished,
            duration_minutes_total: row.duration_minutes_total,
            view_count: row.view_count,
            total_point: row.total_point,
            likes: row.likes,
            dislikes: row.dislikes,
        }
    }
}

/// Wrap a user term for a `LIKE` substring match, escaping wildcards
fn like_pattern(term: &str) -> String {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

/// Translate a [`PlaceFilter`] into a parameterized scan over `traffy_data`
fn build_scan_query(filter: &PlaceFilter) -> QueryBuilder<'static, MySql> {
    let mut qb = QueryBuilder::new(format!(
        "SELECT {} FROM traffy_data WHERE coords IS NOT NULL",
        PLACE_COLUMNS
    ));

    if let Some(term) = &filter.search_term {
        let pattern = like_pattern(term);
        qb.push(" AND (ticket_id LIKE ")
            .push_bind(pattern.clone())
            .push(" OR comment LIKE ")
            .push_bind(pattern.clone())
            .push(" OR organization LIKE ")
            .push_bind(pattern)
            .push(")");
    }

    if let Some(case_type) = &filter.case_type {
        qb.push(" AND `type` LIKE ").push_bind(like_pattern(case_type));
    }

    match filter.state {
        Some(StateFilter::Finished) => {
            qb.push(" AND state = ")
                .push_bind(PlaceState::Finish.as_str());
        }
        Some(StateFilter::NotFinished) => {
            qb.push(" AND (state IS NULL OR state <> ")
                .push_bind(PlaceState::Finish.as_str())
                .push(")");
        }
        None => {}
    }

    if let Some(date) = filter.finished_date {
        qb.push(" AND DATE(timestamp_finished) = ").push_bind(date);
    }

    qb.push(" ORDER BY id");
    qb
}

/// MySQL-backed place repository
pub struct MySqlPlaceRepository {
    pool: MySqlPool,
}

impl MySqlPlaceRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PlaceRepository for MySqlPlaceRepository {
    async fn scan(&self, filter: &PlaceFilter) -> Result<Vec<Place>> {
        let rows = build_scan_query(filter)
            .build_query_as::<PlaceRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to scan places: {:?}", e);
                AppError::Database(e)
            })?;

        Ok(rows.into_iter().map(Place::from).collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Place>> {
        let row = sqlx::query_as::<_, PlaceRow>(&format!(
            "SELECT {} FROM traffy_data WHERE id = ?",
            PLACE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get place {}: {:?}", id, e);
            AppError::Database(e)
        })?;

        Ok(row.map(Place::from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_scan_without_filter_has_no_predicates() {
        let qb = build_scan_query(&PlaceFilter::default());
        let sql = qb.sql();

        assert!(sql.contains("FROM traffy_data WHERE coords IS NOT NULL"));
        assert!(!sql.contains("LIKE"));
        assert!(!sql.contains("state ="));
        assert!(sql.ends_with(" ORDER BY id"));
    }

    #[test]
    fn test_scan_with_every_filter() {
        let filter = PlaceFilter {
            search_term: Some("pothole".to_string()),
            case_type: Some("ถนน".to_string()),
            state: Some(StateFilter::NotFinished),
            finished_date: NaiveDate::from_ymd_opt(2024, 1, 31),
        };
        let qb = build_scan_query(&filter);
        let sql = qb.sql();

        assert!(sql.contains(
            " AND (ticket_id LIKE ? OR comment LIKE ? OR organization LIKE ?)"
        ));
        assert!(sql.contains(" AND `type` LIKE ?"));
        assert!(sql.contains(" AND (state IS NULL OR state <> ?)"));
        assert!(sql.contains(" AND DATE(timestamp_finished) = ?"));
        assert_eq!(sql.matches('?').count(), 6);
    }

    #[test]
    fn test_finished_state_predicate() {
        let filter = PlaceFilter {
            state: Some(StateFilter::Finished),
            ..Default::default()
        };
        let qb = build_scan_query(&filter);
        assert!(qb.sql().contains(" AND state = ?"));
    }

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("abc"), "%abc%");
        assert_eq!(like_pattern("50%_off"), "%50\\%\\_off%");
    }

    #[test]
    fn test_row_conversion_parses_coords_once() {
        let row = PlaceRow {
            id: 7,
            ticket_id: Some("2024-XYZ".to_string()),
            place_type: Some("{ถนน}".to_string()),
            organization: None,
            organization_action: None,
            comment: None,
            coords: Some("13.7563,100.5018".to_string()),
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
            state: Some("inprogress".to_string()),
            star: None,
            count_reopen: 0,
            duration_minutes_inprogress: None,
            duration_minutes_finished: None,
            duration_minutes_total: None,
            view_count: 3,
            total_point: 0,
            likes: 1,
            dislikes: 0,
        };

        let place = Place::from(row);
        assert_eq!(place.coordinates, Coordinates::new(13.7563, 100.5018));
        assert_eq!(place.state, Some(PlaceState::Inprogress));
    }
}
