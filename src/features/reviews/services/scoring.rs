use crate::features::reviews::models::PointsBreakdown;
use crate::shared::constants::{BASE_POINTS, COMMENT_POINTS, POINTS_PER_IMAGE};

/// Points awarded for a review.
///
/// One point per kilometer between reviewer and place (rounded), a bonus for a
/// non-blank comment and a fixed amount per photo, on top of the base award.
pub fn calculate_points(
    distance_meters: f64,
    comment: Option<&str>,
    image_count: usize,
) -> PointsBreakdown {
    let distance = (distance_meters.max(0.0) / 1000.0).round() as i64;
    let comment = match comment.map(str::trim) {
        Some(c) if !c.is_empty() => COMMENT_POINTS,
        _ => 0,
    };
    let image = POINTS_PER_IMAGE * image_count as i64;

    PointsBreakdown {
        base: BASE_POINTS,
        distance,
        comment,
        image,
        total: BASE_POINTS + distance + comment + image,
    }
}
