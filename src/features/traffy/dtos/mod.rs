mod traffy_dto;

pub use traffy_dto::{NearbyFeaturesDto, TraffyFeedDto, TraffyNearbyQuery};
