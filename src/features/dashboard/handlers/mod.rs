mod dashboard_handler;

pub use dashboard_handler::{__path_get_user_dashboard, get_user_dashboard};
