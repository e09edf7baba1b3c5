mod review_aggregator;
mod review_service;
mod scoring;

pub use review_aggregator::ReviewAggregator;
pub use review_service::ReviewService;
