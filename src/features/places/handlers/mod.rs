mod place_handler;

pub use place_handler::{
    __path_get_nearby_places, __path_search_places, get_nearby_places, search_places,
};
