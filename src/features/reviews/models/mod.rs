mod points;
mod review;

pub use points::PointsBreakdown;
pub use review::{
    decode_image_list, encode_image_list, CreateReview, PlaceReviews, ReviewComment,
    ReviewHistoryEntry, ReviewStats, ReviewStatus,
};
