mod review_repository;

pub use review_repository::{MySqlReviewRepository, ReviewRepository};
