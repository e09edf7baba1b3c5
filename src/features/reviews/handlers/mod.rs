mod review_handler;

pub use review_handler::{
    __path_get_review_history, __path_save_review, get_review_history, save_review,
};
