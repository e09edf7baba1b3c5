/// Mean Earth radius in meters used by every distance computation
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

// =============================================================================
// REVIEW SCORING
// =============================================================================

/// Points awarded for every accepted review
pub const BASE_POINTS: i64 = 10;

/// Points awarded when the review carries a non-empty comment
pub const COMMENT_POINTS: i64 = 5;

/// Points awarded per attached photo
pub const POINTS_PER_IMAGE: i64 = 3;

// =============================================================================
// REVIEW INPUT LIMITS
// =============================================================================

/// Maximum number of photos attached to one review
pub const MAX_IMAGES_PER_REVIEW: usize = 10;

/// Maximum size of a single review photo (20MB)
pub const MAX_IMAGE_SIZE: usize = 20 * 1024 * 1024;

