mod place_repository;

pub use place_repository::{MySqlPlaceRepository, PlaceRepository};
