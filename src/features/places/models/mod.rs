mod place;
mod place_filter;

pub use place::{LocatedPlace, Place, PlaceState};
pub use place_filter::{PlaceFilter, StateFilter};
